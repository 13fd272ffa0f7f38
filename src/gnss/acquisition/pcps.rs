use rayon::prelude::*;
use rustfft::num_complex::Complex;

use crate::AcqErr;
use super::correlator::Correlator;
use super::surface::PowerSurface;

/// Parallel code phase search over one coherent block.  For every Doppler bin the
/// block starting at block_offset is wiped off at fi + fd, correlated against the
/// code spectrum, and the power of the first round(fs * t) lags becomes that bin's
/// row.  The block is as long as the code spectrum, so a zero-padded spectrum
/// reads twice as many samples as it produces lags.
pub fn search_block(correlator:&dyn Correlator, code_spectrum:&[Complex<f64>], t:f64, buffer:&[Complex<f64>], block_offset:usize,
	fs:f64, fi:f64, doppler_bins:&[f64], parallel:bool) -> Result<PowerSurface, AcqErr> {

	let n:usize = samples_per_code(fs, t)?;
	let block_len:usize = code_spectrum.len();
	if block_offset + block_len > buffer.len() {
		return Err(AcqErr::BufferTooShort{ needed: block_offset + block_len, got: buffer.len() });
	}
	if n > block_len {
		return Err(AcqErr::LengthMismatch{ data: n, code: block_len });
	}

	let search_bin = |fd:&f64| -> Result<Vec<f64>, AcqErr> {
		let wiped = correlator.mix_carrier(buffer, block_offset, block_len, fs, fi + fd, 0.0)?;
		let corr = correlator.fft_correlate(&wiped, code_spectrum)?;
		Ok(corr[..n].iter().map(|c| c.norm_sqr()).collect())
	};

	// Rows are independent, so bins can go to any worker; collect keeps them in grid order
	let rows:Vec<Vec<f64>> = if parallel {
		doppler_bins.par_iter().map(search_bin).collect::<Result<_, _>>()?
	} else {
		doppler_bins.iter().map(search_bin).collect::<Result<_, _>>()?
	};

	Ok(PowerSurface::from_rows(rows))
}

/// Samples in one code cycle, rounded to the nearest sample
pub fn samples_per_code(fs:f64, t:f64) -> Result<usize, AcqErr> {
	if !(fs > 0.0) { return Err(AcqErr::InvalidSampleRate(fs)); }
	if !(t > 0.0)  { return Err(AcqErr::InvalidCodeCycle(t)); }
	match (fs * t).round() as usize {
		0 => Err(AcqErr::InvalidSampleRate(fs)),
		n => Ok(n),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gnss::acquisition::correlator::{make_correlator, Backend};
	use crate::gnss::code::{generate_code_spectrum, resample_code, CodeGenerator, StandardCodes};
	use crate::gnss::SignalType;

	const FS:f64 = 2.046e6;
	const T:f64 = 1.0e-3;

	fn signal(n:usize, code_offset:usize, doppler_hz:f64, len:usize) -> Vec<Complex<f64>> {
		let code = StandardCodes.generate_code(SignalType::L1CA, 5);
		let replica = resample_code(&code, T, 0.0, FS, n, 0);
		(0..len).map(|i| {
			let phase = 2.0 * std::f64::consts::PI * doppler_hz * (i as f64) / FS;
			replica[(i + n - code_offset) % n] * Complex{ re: phase.cos(), im: phase.sin() }
		}).collect()
	}

	#[test]
	fn peak_lands_on_signal() {
		let n = samples_per_code(FS, T).unwrap();
		let code = StandardCodes.generate_code(SignalType::L1CA, 5);
		let spectrum = generate_code_spectrum(&code, T, 0.0, FS, n, n);
		let buffer = signal(n, 777, -1500.0, 2*n);
		let bins:Vec<f64> = (-4..=4).map(|k| (k as f64) * 500.0).collect();

		for &parallel in &[true, false] {
			let corr = make_correlator(Backend::Reference).unwrap();
			let surface = search_block(&*corr, &spectrum, T, &buffer, 0, FS, 0.0, &bins, parallel).unwrap();
			assert_eq!(surface.shape(), (9, n));
			let (_, (d, o)) = surface.argmax().unwrap();
			assert_eq!(bins[d], -1500.0);
			assert_eq!(o, 777);
		}
	}

	#[test]
	fn sequential_and_parallel_rows_match() {
		let n = samples_per_code(FS, T).unwrap();
		let code = StandardCodes.generate_code(SignalType::L1CA, 5);
		let spectrum = generate_code_spectrum(&code, T, 0.0, FS, n, 0);
		let buffer = signal(n, 12, 300.0, 3*n);
		let bins = vec![-500.0, 0.0, 500.0];
		let corr = make_correlator(Backend::default()).unwrap();

		let a = search_block(&*corr, &spectrum, T, &buffer, n, FS, 0.0, &bins, true).unwrap();
		let b = search_block(&*corr, &spectrum, T, &buffer, n, FS, 0.0, &bins, false).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn block_past_the_end_is_rejected() {
		let n = samples_per_code(FS, T).unwrap();
		let code = StandardCodes.generate_code(SignalType::L1CA, 5);
		let spectrum = generate_code_spectrum(&code, T, 0.0, FS, n, n);
		let buffer = signal(n, 0, 0.0, 2*n);
		let corr = make_correlator(Backend::Reference).unwrap();

		let ans = search_block(&*corr, &spectrum, T, &buffer, 1, FS, 0.0, &[0.0], true);
		assert!(matches!(ans, Err(AcqErr::BufferTooShort{ .. })));
	}

	#[test]
	fn rounding_samples_per_code() {
		assert_eq!(samples_per_code(4.0e6, 1.0e-3).unwrap(), 4000);
		assert_eq!(samples_per_code(2.046e6, 1.0e-3).unwrap(), 2046);
		assert_eq!(samples_per_code(12.0e6, 20.0e-3).unwrap(), 240000);
		assert!(matches!(samples_per_code(0.0, 1.0e-3), Err(AcqErr::InvalidSampleRate(_))));
		assert!(matches!(samples_per_code(4.0e6, -1.0), Err(AcqErr::InvalidCodeCycle(_))));
		assert!(matches!(samples_per_code(100.0, 1.0e-3), Err(AcqErr::InvalidSampleRate(_))));
	}

}
