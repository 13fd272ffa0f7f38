use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::AcqErr;

pub const L1CA_CODE_LEN:usize = 1023;
pub const GLONASS_CA_CODE_LEN:usize = 511;

pub const L1CA_CODE_CYCLE_SEC:f64 = 1.0e-3;
pub const GLONASS_CA_CODE_CYCLE_SEC:f64 = 1.0e-3;

// FDMA channel spacing of the GLONASS legacy bands
pub const G1CA_CHANNEL_SPACING_HZ:f64 = 0.5625e6;
pub const G2CA_CHANNEL_SPACING_HZ:f64 = 0.4375e6;

/// Signal families the acquisition knows how to search for.  For the GLONASS
/// FDMA signals the "PRN" passed around the crate is the frequency channel
/// number (-7 to +6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
	L1CA,
	G1CA,
	G2CA,
}

impl SignalType {

	pub fn code_len(&self) -> usize { match self {
		SignalType::L1CA => L1CA_CODE_LEN,
		SignalType::G1CA | SignalType::G2CA => GLONASS_CA_CODE_LEN,
	}}

	pub fn code_cycle_sec(&self) -> f64 { match self {
		SignalType::L1CA => L1CA_CODE_CYCLE_SEC,
		SignalType::G1CA | SignalType::G2CA => GLONASS_CA_CODE_CYCLE_SEC,
	}}

	/// Carrier spacing between adjacent FDMA channels, or None for CDMA signals
	pub fn fdma_channel_spacing_hz(&self) -> Option<f64> { match self {
		SignalType::G1CA => Some(G1CA_CHANNEL_SPACING_HZ),
		SignalType::G2CA => Some(G2CA_CHANNEL_SPACING_HZ),
		SignalType::L1CA => None,
	}}

}

impl fmt::Display for SignalType {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			SignalType::L1CA => "L1CA",
			SignalType::G1CA => "G1CA",
			SignalType::G2CA => "G2CA",
		};
		write!(f, "{}", s)
	}
}

impl FromStr for SignalType {
	type Err = AcqErr;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"L1CA" => Ok(SignalType::L1CA),
			"G1CA" => Ok(SignalType::G1CA),
			"G2CA" => Ok(SignalType::G2CA),
			_      => Err(AcqErr::UnknownSignal(s.to_owned())),
		}
	}
}
