use std::f64::consts;
use std::sync::{Arc, Mutex};

use rustfft::{FFT, FFTplanner};
use rustfft::num_complex::Complex;

use crate::AcqErr;

/// Correlator that evaluates the carrier directly and keeps FFT plans between
/// calls.  The planners sit behind mutexes that are only taken to look up a plan,
/// so concurrent Doppler bins share plans without contending on the samples.
pub struct NativeCorrelator {
	fwd_planner: Mutex<FFTplanner<f64>>,
	inv_planner: Mutex<FFTplanner<f64>>,
}

impl NativeCorrelator {

	pub fn new() -> Self {
		NativeCorrelator{ fwd_planner: Mutex::new(FFTplanner::new(false)), inv_planner: Mutex::new(FFTplanner::new(true)) }
	}

	fn plans(&self, len:usize) -> (Arc<dyn FFT<f64>>, Arc<dyn FFT<f64>>) {
		// A poisoned planner is still a valid cache of plans
		let fft  = self.fwd_planner.lock().unwrap_or_else(|e| e.into_inner()).plan_fft(len);
		let ifft = self.inv_planner.lock().unwrap_or_else(|e| e.into_inner()).plan_fft(len);
		(fft, ifft)
	}

}

impl Default for NativeCorrelator {
	fn default() -> Self { Self::new() }
}

impl super::Correlator for NativeCorrelator {

	fn name(&self) -> &'static str { "native" }

	fn mix_carrier(&self, buffer:&[Complex<f64>], start:usize, length:usize, fs:f64, fc:f64, phase:f64) -> Result<Vec<Complex<f64>>, AcqErr> {
		super::check_mix_range(buffer, start, length)?;

		let cycles_per_sample:f64 = fc / fs;
		Ok(buffer[start..(start + length)].iter().enumerate().map(|(n, x)| {
			// Only the fractional cycle matters and keeping it small keeps sin/cos accurate
			let cycles:f64 = cycles_per_sample * (n as f64) + phase;
			let arg:f64 = -2.0 * consts::PI * (cycles - cycles.floor());
			x * Complex{ re: arg.cos(), im: arg.sin() }
		}).collect())
	}

	fn fft_correlate(&self, data:&[Complex<f64>], code_spectrum:&[Complex<f64>]) -> Result<Vec<Complex<f64>>, AcqErr> {
		super::check_correlate_lengths(data, code_spectrum)?;
		if data.is_empty() { return Ok(vec![]); }

		let (fft, ifft) = self.plans(data.len());
		Ok(super::correlate_planned(&*fft, &*ifft, data, code_spectrum))
	}

}
