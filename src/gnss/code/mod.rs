use rustfft::{FFT, FFTplanner};
use rustfft::num_complex::Complex;
use num_traits::Zero;

use crate::gnss::SignalType;

pub mod glonass;
pub mod gps_l1_ca;

/// Source of spreading code replicas for the acquisition.  An empty code means
/// the signal/PRN combination isn't supported, which isn't an error.
pub trait CodeGenerator: Send + Sync {
	fn generate_code(&self, signal:SignalType, prn:i32) -> Vec<i8>;
	fn code_cycle_time(&self, signal:SignalType) -> f64;
}

/// Codes for every signal in SignalType, generated on request
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCodes;

impl CodeGenerator for StandardCodes {

	fn generate_code(&self, signal:SignalType, prn:i32) -> Vec<i8> { match signal {
		SignalType::L1CA => gps_l1_ca::prn_int(prn),
		SignalType::G1CA | SignalType::G2CA => glonass::st_code_int(prn),
	}}

	fn code_cycle_time(&self, signal:SignalType) -> f64 { signal.code_cycle_sec() }

}

/// Sample n points of a code with code cycle t [sec] at fs [samples/sec], starting
/// coff [sec] into the code, then append nz zeros
pub fn resample_code(code:&[i8], t:f64, coff:f64, fs:f64, n:usize, nz:usize) -> Vec<Complex<f64>> {
	if code.is_empty() { return vec![]; }

	let len = code.len() as i64;
	let dx:f64 = (code.len() as f64) / t / fs;		// [chips/sample]
	let mut ans:Vec<Complex<f64>> = (0..n).map(|i| {
		let chip_idx = (((coff * fs) + (i as f64)) * dx).floor() as i64;
		Complex{ re: code[chip_idx.rem_euclid(len) as usize] as f64, im: 0.0 }
	}).collect();

	ans.resize(n + nz, Complex::zero());
	ans
}

/// Conjugated DFT of the resampled (and optionally zero-padded) code, ready to
/// multiply against the DFT of a block of samples
pub fn generate_code_spectrum(code:&[i8], t:f64, coff:f64, fs:f64, n:usize, nz:usize) -> Vec<Complex<f64>> {
	let mut time_domain:Vec<Complex<f64>> = resample_code(code, t, coff, fs, n, nz);
	if time_domain.is_empty() { return vec![]; }

	let mut freq_domain:Vec<Complex<f64>> = vec![Complex::zero(); time_domain.len()];
	let mut planner = FFTplanner::<f64>::new(false);
	let fft = planner.plan_fft(time_domain.len());
	fft.process(&mut time_domain, &mut freq_domain);

	freq_domain.into_iter().map(|c| c.conj()).collect()
}
