use thiserror::Error;

pub mod gnss;
pub mod io;
pub mod utils;

#[derive(Debug, Error)]
pub enum AcqErr {
	#[error("Sampling frequency must be positive, got {0} [Hz]")]
	InvalidSampleRate(f64),

	#[error("Code cycle must be positive, got {0} [sec]")]
	InvalidCodeCycle(f64),

	#[error("Invalid Doppler search range: max_dop={max_dop} [Hz], dop_step={dop_step}")]
	InvalidDopplerRange { max_dop:f64, dop_step:f64 },

	#[error("Buffer too short: {needed} samples needed, {got} available")]
	BufferTooShort { needed:usize, got:usize },

	#[error("Length mismatch: data has {data} samples, code spectrum has {code}")]
	LengthMismatch { data:usize, code:usize },

	#[error("Correlator backend unavailable: {0}")]
	BackendUnavailable(&'static str),

	#[error("Unknown signal type {0:?}")]
	UnknownSignal(String),

	#[error("Invalid number list {0:?}")]
	InvalidNumberList(String),

	#[error("Unknown sample format {0:?}")]
	UnknownSampleFormat(String),

	#[error("Short read: {needed} samples needed, {got} read")]
	ShortRead { needed:usize, got:usize },

	#[error("Invalid configuration: {0}")]
	Config(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
