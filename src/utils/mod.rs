
use crate::AcqErr;

/// Parse a comma separated list of integers and inclusive ranges, e.g. "1-5,7" or
/// "-7--1,0-6" for GLONASS channel numbers.  A leading minus is a sign; the first
/// minus after it separates the ends of a range.
pub fn parse_nums(s:&str) -> Result<Vec<i32>, AcqErr> {
	let invalid = || AcqErr::InvalidNumberList(s.to_owned());
	let mut nums:Vec<i32> = vec![];

	for tok in s.split(',').map(|t| t.trim()) {
		let sign_len:usize = if tok.starts_with('-') { 1 } else { 0 };
		match tok[sign_len..].find('-') {
			Some(idx) => {
				let (lo, hi) = (&tok[..(sign_len + idx)], &tok[(sign_len + idx + 1)..]);
				let lo:i32 = lo.parse().map_err(|_| invalid())?;
				let hi:i32 = hi.parse().map_err(|_| invalid())?;
				if lo > hi { return Err(invalid()); }
				nums.extend(lo..=hi);
			},
			None => nums.push(tok.parse().map_err(|_| invalid())?),
		}
	}

	Ok(nums)
}
