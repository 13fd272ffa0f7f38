use log::{debug, trace, warn};
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::AcqErr;
use crate::gnss::SignalType;
use crate::gnss::code::{self, CodeGenerator, StandardCodes};

pub mod correlator;
pub mod detection;
pub mod frequency_plan;
pub mod pcps;
pub mod surface;


use self::correlator::{Backend, Correlator};
use self::surface::PowerSurface;

/// Default max Doppler frequency to search [Hz]
pub const MAX_DOP:f64 = 5000.0;

/// Doppler search step as a fraction of 1 / code cycle.  0.25 halves the
/// straddle loss at twice the cost per block.
pub const DOP_STEP:f64 = 0.5;

pub const CN0_THRESHOLD_DB_HZ:f64 = 38.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
	pub max_dop: f64,
	pub dop_step: f64,
	pub zero_pad: bool,
	pub backend: Backend,
	pub parallel: bool,
	pub cn0_threshold: f64,
}

impl Default for SearchConfig {
	fn default() -> Self {
		SearchConfig{ max_dop: MAX_DOP, dop_step: DOP_STEP, zero_pad: true, backend: Backend::default(), parallel: true,
			cn0_threshold: CN0_THRESHOLD_DB_HZ }
	}
}

#[derive(Debug, Clone)]
pub struct SearchResult {
	/// Accumulated correlation power divided by its peak
	pub power: PowerSurface,
	pub doppler_bins: Vec<f64>,
	/// Code offset of each column [sec]
	pub code_offsets: Vec<f64>,
	/// (Doppler bin, code offset) of the peak
	pub peak_idx: (usize, usize),
	pub cn0_db_hz: f64,
	/// Doppler refined between bins [Hz]
	pub doppler_hz: f64,
	pub num_blocks: usize,
}

impl SearchResult {

	pub fn coarse_doppler_hz(&self) -> f64 { self.doppler_bins[self.peak_idx.0] }
	pub fn code_offset_sec(&self) -> f64 { self.code_offsets[self.peak_idx.1] }
	pub fn code_offset_samples(&self) -> usize { self.peak_idx.1 }

	pub fn is_acquired(&self, cn0_threshold_db_hz:f64) -> bool { self.cn0_db_hz >= cn0_threshold_db_hz }

}

/// Outcome of one search.  NotFound means there was no code to search with (an
/// unsupported signal/PRN combination); whether a Found search actually detected
/// a signal is up to SearchResult::is_acquired.
#[derive(Debug, Clone)]
pub enum Acquisition {
	Found(SearchResult),
	NotFound,
}

impl Acquisition {

	pub fn is_found(&self) -> bool { matches!(self, Acquisition::Found(_)) }

	pub fn found(self) -> Option<SearchResult> { match self {
		Acquisition::Found(r) => Some(r),
		Acquisition::NotFound => None,
	}}

}

pub struct Acquirer {
	config: SearchConfig,
	correlator: Box<dyn Correlator>,
	codes: Box<dyn CodeGenerator>,
}

impl Acquirer {

	pub fn new(config:SearchConfig) -> Result<Self, AcqErr> {
		Self::with_code_generator(config, StandardCodes)
	}

	pub fn with_code_generator<G: 'static + CodeGenerator>(config:SearchConfig, codes:G) -> Result<Self, AcqErr> {
		let correlator = correlator::make_correlator(config.backend)?;
		Ok(Acquirer{ config, correlator, codes: Box::new(codes) })
	}

	pub fn config(&self) -> &SearchConfig { &self.config }
	pub fn correlator(&self) -> &dyn Correlator { &*self.correlator }

	/// Search the whole buffer for one signal.  Successive blocks start one code
	/// cycle apart and their power surfaces are summed (non-coherent integration).
	/// With zero padding each block is two code cycles long, so neighboring blocks
	/// overlap by a cycle.
	pub fn acquire(&self, signal:SignalType, prn:i32, buffer:&[Complex<f64>], fs:f64, fi:f64) -> Result<Acquisition, AcqErr> {
		if !(fs > 0.0) { return Err(AcqErr::InvalidSampleRate(fs)); }

		let code:Vec<i8> = self.codes.generate_code(signal, prn);
		if code.is_empty() {
			debug!("No code for {} PRN {}", signal, prn);
			return Ok(Acquisition::NotFound);
		}

		let fi:f64 = frequency_plan::shift_center_frequency(signal, prn, fi);

		let t:f64 = self.codes.code_cycle_time(signal);
		let n:usize = pcps::samples_per_code(fs, t)?;
		let nz:usize = if self.config.zero_pad { n } else { 0 };
		let code_spectrum:Vec<Complex<f64>> = code::generate_code_spectrum(&code, t, 0.0, fs, n, nz);

		let doppler_bins:Vec<f64> = frequency_plan::doppler_bins(t, self.config.max_dop, self.config.dop_step)?;

		let block_len:usize = code_spectrum.len();
		if buffer.len() < block_len {
			return Err(AcqErr::BufferTooShort{ needed: block_len, got: buffer.len() });
		}
		let starts:Vec<usize> = (0..=(buffer.len() - block_len)).step_by(n).collect();
		let unused:usize = buffer.len() - (starts[starts.len()-1] + block_len);
		if unused > 0 {
			warn!("{} PRN {}: last {} samples don't fill a block and are ignored", signal, prn, unused);
		}

		debug!("{} PRN {}: {} blocks of {} samples, {} Doppler bins over [{}, {}] [Hz], IF {} [Hz]", signal, prn, starts.len(),
			block_len, doppler_bins.len(), doppler_bins[0], doppler_bins[doppler_bins.len()-1], fi);

		let n_bins:usize = doppler_bins.len();
		let parallel:bool = self.config.parallel;
		let search = |start:usize| -> Result<PowerSurface, AcqErr> {
			trace!("{} PRN {}: block at sample {}", signal, prn, start);
			pcps::search_block(&*self.correlator, &code_spectrum, t, buffer, start, fs, fi, &doppler_bins, parallel)
		};

		// Each worker sums its own blocks and the partial sums are added at the end
		let power:PowerSurface = if parallel {
			starts.par_iter()
				.try_fold(|| PowerSurface::zeros(n_bins, n), |mut acc:PowerSurface, start:&usize| -> Result<PowerSurface, AcqErr> {
					acc.accumulate(&search(*start)?);
					Ok(acc)
				})
				.try_reduce(|| PowerSurface::zeros(n_bins, n), |mut a, b| {
					a.accumulate(&b);
					Ok(a)
				})?
		} else {
			let mut acc = PowerSurface::zeros(n_bins, n);
			for start in starts.iter() {
				acc.accumulate(&search(*start)?);
			}
			acc
		};

		let peak = detection::peak_and_noise(&power, t);
		let doppler_hz:f64 = detection::refine_doppler(&power.column(peak.offset_idx), &doppler_bins, peak.doppler_idx);

		let power = if peak.value > 0.0 { power.scaled(1.0 / peak.value) } else { power };
		let code_offsets:Vec<f64> = (0..n).map(|i| (i as f64) / fs).collect();

		Ok(Acquisition::Found(SearchResult{ power, doppler_bins, code_offsets, peak_idx: (peak.doppler_idx, peak.offset_idx),
			cn0_db_hz: peak.cn0_db_hz, doppler_hz, num_blocks: starts.len() }))
	}

}
