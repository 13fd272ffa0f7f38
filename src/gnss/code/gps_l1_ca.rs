
use crate::gnss::signal::L1CA_CODE_LEN;

// G2 phase selector taps, IS-GPS-200, Table 3-Ia (1-based register stages)
const G2_TAPS:[(usize, usize); 32] = [
	(2, 6), (3, 7), (4, 8), (5, 9), (1, 9), (2, 10), (1, 8), (2, 9),		// PRN 01-08
	(3, 10), (2, 3), (3, 4), (5, 6), (6, 7), (7, 8), (8, 9), (9, 10),		// PRN 09-16
	(1, 4), (2, 5), (3, 6), (4, 7), (5, 8), (6, 9), (1, 3), (4, 6),			// PRN 17-24
	(5, 7), (6, 8), (7, 9), (8, 10), (1, 6), (2, 7), (3, 8), (4, 9),		// PRN 25-32
];

pub struct ShiftRegister {
	pub state: [bool; 10],
}

impl ShiftRegister {

	pub fn all_ones() -> Self { ShiftRegister{ state: [true; 10] } }

	// Stage numbers in the feedback list are 1-based to match the ICD
	pub fn shift(&mut self, feedback_stages:&[usize]) {
		let feedback:bool = feedback_stages.iter().fold(false, |acc, s| acc ^ self.state[s-1]);
		for idx in (1..10).rev() {
			self.state[idx] = self.state[idx-1];
		}
		self.state[0] = feedback;
	}

	pub fn stage(&self, s:usize) -> bool { self.state[s-1] }

}

/// Chips of the L1 C/A Gold code for the given PRN as bits (true is a logical one)
pub fn prn_bits(prn:usize) -> Option<[bool; L1CA_CODE_LEN]> {
	if prn >= 1 && prn <= G2_TAPS.len() {
		let (tap_a, tap_b) = G2_TAPS[prn-1];
		let mut g1 = ShiftRegister::all_ones();
		let mut g2 = ShiftRegister::all_ones();

		let mut ans:[bool; L1CA_CODE_LEN] = [false; L1CA_CODE_LEN];
		for chip in ans.iter_mut() {
			*chip = g1.stage(10) ^ g2.stage(tap_a) ^ g2.stage(tap_b);
			g1.shift(&[3, 10]);
			g2.shift(&[2, 3, 6, 8, 9, 10]);
		}
		Some(ans)
	} else {
		None
	}
}

/// Chips as +1 for a logical zero and -1 for a logical one; empty for an unsupported PRN
pub fn prn_int(prn:i32) -> Vec<i8> {
	if prn < 1 { return vec![]; }
	match prn_bits(prn as usize) {
		Some(bits) => bits.iter().map(|b| if *b { -1 } else { 1 }).collect(),
		None       => vec![],
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn first_ten_octal(prn:usize) -> u16 {
		let bits = prn_bits(prn).unwrap();
		bits[..10].iter().fold(0u16, |acc, b| (acc << 1) | (*b as u16))
	}

	#[test]
	fn first_chips_match_icd() {
		// First 10 chips in octal, IS-GPS-200 Table 3-Ia
		assert_eq!(first_ten_octal(1),  0o1440);
		assert_eq!(first_ten_octal(2),  0o1620);
		assert_eq!(first_ten_octal(3),  0o1710);
		assert_eq!(first_ten_octal(4),  0o1744);
		assert_eq!(first_ten_octal(8),  0o1454);
		assert_eq!(first_ten_octal(32), 0o1712);
	}

	#[test]
	fn gold_code_balance() {
		// Every C/A code has 512 ones and 511 zeros
		for prn in 1..=32 {
			let ones = prn_bits(prn).unwrap().iter().filter(|b| **b).count();
			assert_eq!(ones, 512, "PRN {}", prn);
		}
	}

	#[test]
	fn unsupported_prn_is_empty() {
		assert!(prn_int(0).is_empty());
		assert!(prn_int(33).is_empty());
		assert!(prn_int(-3).is_empty());
		assert_eq!(prn_int(7).len(), L1CA_CODE_LEN);
	}

}
