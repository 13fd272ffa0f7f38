use std::fmt;
use std::str::FromStr;

use rustfft::FFT;
use rustfft::num_complex::Complex;
use num_traits::Zero;
use serde::{Serialize, Deserialize};

use crate::AcqErr;

#[cfg(feature = "native")]
pub mod native;
pub mod reference;

/// Carrier wipe-off and correlation primitives used by the code search.  Every
/// implementation has to give the same answers to within floating-point
/// tolerance (or the phase quantization of a lookup table, for mixing).
pub trait Correlator: Send + Sync {

	fn name(&self) -> &'static str;

	/// Multiply buffer[start..start+length] by exp(-j*2*pi*(fc/fs*n + phase)), where
	/// phase is in cycles
	fn mix_carrier(&self, buffer:&[Complex<f64>], start:usize, length:usize, fs:f64, fc:f64, phase:f64) -> Result<Vec<Complex<f64>>, AcqErr>;

	/// Circular correlation IFFT(FFT(data) * code_spectrum) / len(data).  The code
	/// spectrum has to already be the conjugated DFT of the (padded) replica.
	fn fft_correlate(&self, data:&[Complex<f64>], code_spectrum:&[Complex<f64>]) -> Result<Vec<Complex<f64>>, AcqErr>;

	/// Time-domain correlation at explicit sample offsets, each normalized by the
	/// length of the overlap.  Offsets must be within (-len(data), len(data)); the
	/// ones that aren't produce zero.
	fn std_correlate(&self, data:&[Complex<f64>], code:&[Complex<f64>], offsets:&[i32]) -> Vec<Complex<f64>> {
		let n = data.len() as i64;
		offsets.iter().map(|&pos| {
			let pos = pos as i64;
			if pos.abs() >= n { return Complex::zero(); }

			let (data_part, code_part) = if pos >= 0 {
				(&data[(pos as usize)..], code)
			} else {
				(&data[..((n + pos) as usize)], &code[((-pos) as usize).min(code.len())..])
			};

			let sum:Complex<f64> = data_part.iter().zip(code_part.iter()).fold(Complex::zero(), |acc, (d, c)| acc + d * c);
			sum / ((n - pos.abs()) as f64)
		}).collect()
	}

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
	Reference,
	Native,
}

impl Default for Backend {
	fn default() -> Self {
		if cfg!(feature = "native") { Backend::Native } else { Backend::Reference }
	}
}

impl fmt::Display for Backend {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Backend::Reference => write!(f, "reference"),
			Backend::Native    => write!(f, "native"),
		}
	}
}

impl FromStr for Backend {
	type Err = AcqErr;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"reference" => Ok(Backend::Reference),
			"native"    => Ok(Backend::Native),
			_           => Err(AcqErr::BackendUnavailable("unknown backend name")),
		}
	}
}

/// Build the correlator for a backend.  Asking for one that wasn't compiled in
/// is an error rather than a silent fallback.
pub fn make_correlator(backend:Backend) -> Result<Box<dyn Correlator>, AcqErr> {
	let correlator:Box<dyn Correlator> = match backend {
		Backend::Reference => Box::new(reference::ReferenceCorrelator::new()),
		#[cfg(feature = "native")]
		Backend::Native    => Box::new(native::NativeCorrelator::new()),
		#[cfg(not(feature = "native"))]
		Backend::Native    => return Err(AcqErr::BackendUnavailable("built without the \"native\" feature")),
	};
	log::debug!("Using the {} correlator", correlator.name());
	Ok(correlator)
}

pub(crate) fn check_mix_range(buffer:&[Complex<f64>], start:usize, length:usize) -> Result<(), AcqErr> {
	if start + length > buffer.len() {
		Err(AcqErr::BufferTooShort{ needed: start + length, got: buffer.len() })
	} else {
		Ok(())
	}
}

// Shared by both backends once they have their plans in hand
pub(crate) fn correlate_planned(fft:&dyn FFT<f64>, ifft:&dyn FFT<f64>, data:&[Complex<f64>], code_spectrum:&[Complex<f64>]) -> Vec<Complex<f64>> {
	let n = data.len();
	let mut time_domain:Vec<Complex<f64>> = data.to_vec();
	let mut freq_domain:Vec<Complex<f64>> = vec![Complex::zero(); n];
	fft.process(&mut time_domain, &mut freq_domain);

	// Multiplication in the freq domain is correlation in the time domain since the code spectrum is conjugated
	for (x, c) in freq_domain.iter_mut().zip(code_spectrum.iter()) {
		*x = *x * *c;
	}

	// rustfft's inverse is unnormalized, so one factor of n undoes it and the other
	// makes this the mean over the block rather than the sum
	ifft.process(&mut freq_domain, &mut time_domain);
	let scale:f64 = 1.0 / ((n as f64) * (n as f64));
	time_domain.into_iter().map(|c| c * scale).collect()
}

pub(crate) fn check_correlate_lengths(data:&[Complex<f64>], code_spectrum:&[Complex<f64>]) -> Result<(), AcqErr> {
	if data.len() != code_spectrum.len() {
		Err(AcqErr::LengthMismatch{ data: data.len(), code: code_spectrum.len() })
	} else {
		Ok(())
	}
}
