
use crate::gnss::signal::GLONASS_CA_CODE_LEN;

pub const MIN_FCN:i32 = -7;
pub const MAX_FCN:i32 = 6;

/// The GLONASS standard-accuracy ranging code, shared by every FDMA channel on
/// L1 and L2.  Generated by 1 + x^5 + x^9 starting from all ones, output taken
/// from the seventh stage.
pub fn st_code_bits() -> [bool; GLONASS_CA_CODE_LEN] {
	let mut state:[bool; 9] = [true; 9];
	let mut ans:[bool; GLONASS_CA_CODE_LEN] = [false; GLONASS_CA_CODE_LEN];
	for chip in ans.iter_mut() {
		*chip = state[6];
		let feedback:bool = state[4] ^ state[8];
		for idx in (1..9).rev() {
			state[idx] = state[idx-1];
		}
		state[0] = feedback;
	}
	ans
}

/// Chips for the given frequency channel number; empty outside of -7 to +6
pub fn st_code_int(fcn:i32) -> Vec<i8> {
	if fcn < MIN_FCN || fcn > MAX_FCN { return vec![]; }
	st_code_bits().iter().map(|b| if *b { -1 } else { 1 }).collect()
}
