use std::f64::consts;

use rustfft::FFTplanner;
use rustfft::num_complex::Complex;

use crate::AcqErr;

pub const CARRIER_TABLE_LEN:usize = 256;

/// Portable correlator: carrier wipe-off through a lookup table of unit-circle
/// samples and freshly planned FFTs on every call.  The table trades a little
/// phase noise (at most half a table step) for fewer trig evaluations.
pub struct ReferenceCorrelator {
	carrier_table: Vec<Complex<f64>>,
}

impl ReferenceCorrelator {

	pub fn new() -> Self {
		let carrier_table = (0..CARRIER_TABLE_LEN).map(|idx| {
			let phase:f64 = -2.0 * consts::PI * (idx as f64) / (CARRIER_TABLE_LEN as f64);
			Complex{ re: phase.cos(), im: phase.sin() }
		}).collect();

		ReferenceCorrelator{ carrier_table }
	}

}

impl Default for ReferenceCorrelator {
	fn default() -> Self { Self::new() }
}

impl super::Correlator for ReferenceCorrelator {

	fn name(&self) -> &'static str { "reference" }

	fn mix_carrier(&self, buffer:&[Complex<f64>], start:usize, length:usize, fs:f64, fc:f64, phase:f64) -> Result<Vec<Complex<f64>>, AcqErr> {
		super::check_mix_range(buffer, start, length)?;

		let cycles_per_sample:f64 = fc / fs;
		let table_len = CARRIER_TABLE_LEN as i64;
		Ok(buffer[start..(start + length)].iter().enumerate().map(|(n, x)| {
			let cycles:f64 = cycles_per_sample * (n as f64) + phase;
			let idx = ((cycles * (CARRIER_TABLE_LEN as f64)).round() as i64).rem_euclid(table_len);
			x * self.carrier_table[idx as usize]
		}).collect())
	}

	fn fft_correlate(&self, data:&[Complex<f64>], code_spectrum:&[Complex<f64>]) -> Result<Vec<Complex<f64>>, AcqErr> {
		super::check_correlate_lengths(data, code_spectrum)?;
		if data.is_empty() { return Ok(vec![]); }

		let fft  = FFTplanner::<f64>::new(false).plan_fft(data.len());
		let ifft = FFTplanner::<f64>::new(true).plan_fft(data.len());
		Ok(super::correlate_planned(&*fft, &*ifft, data, code_spectrum))
	}

}
