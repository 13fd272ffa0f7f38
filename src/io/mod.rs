
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::AcqErr;

/// Layout of the raw samples in an IF data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
	/// Real signed bytes
	I8,
	/// Interleaved signed byte pairs, read as I - jQ
	I8IQ,
	/// Interleaved little-endian i16 pairs, read as I + jQ
	I16IQ,
}

impl SampleFormat {

	pub fn bytes_per_sample(&self) -> usize { match self {
		SampleFormat::I8    => 1,
		SampleFormat::I8IQ  => 2,
		SampleFormat::I16IQ => 4,
	}}

	fn decode(&self, raw:&[u8]) -> Complex<f64> { match self {
		SampleFormat::I8    => Complex{ re: (raw[0] as i8) as f64, im: 0.0 },
		SampleFormat::I8IQ  => Complex{ re: (raw[0] as i8) as f64, im: -((raw[1] as i8) as f64) },
		SampleFormat::I16IQ => Complex{ re: LittleEndian::read_i16(&raw[0..2]) as f64, im: LittleEndian::read_i16(&raw[2..4]) as f64 },
	}}

}

impl FromStr for SampleFormat {
	type Err = AcqErr;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"i8"    => Ok(SampleFormat::I8),
			"i8iq"  => Ok(SampleFormat::I8IQ),
			"i16iq" => Ok(SampleFormat::I16IQ),
			_ => Err(AcqErr::UnknownSampleFormat(s.to_owned())),
		}
	}
}

/// Read t seconds of samples starting toff seconds into the file.  A t of zero
/// reads everything after the offset; a trailing partial sample is dropped.
pub fn read_if_data<P: AsRef<Path>>(path:P, fs:f64, format:SampleFormat, t:f64, toff:f64) -> Result<Vec<Complex<f64>>, AcqErr> {
	if !(fs > 0.0) { return Err(AcqErr::InvalidSampleRate(fs)); }

	let bps:usize = format.bytes_per_sample();
	let skip:usize = (fs * toff.max(0.0)) as usize;
	let count:Option<usize> = if t > 0.0 { Some((fs * t) as usize) } else { None };

	let mut file = File::open(path.as_ref())?;
	file.seek(SeekFrom::Start((skip * bps) as u64))?;

	let mut raw:Vec<u8> = vec![];
	match count {
		Some(n) => { file.take((n * bps) as u64).read_to_end(&mut raw)?; },
		None    => { file.read_to_end(&mut raw)?; },
	}

	let got:usize = raw.len() / bps;
	if let Some(needed) = count {
		if got < needed { return Err(AcqErr::ShortRead{ needed, got }); }
	}

	debug!("Read {} {:?} samples from {} after skipping {}", got, format, path.as_ref().display(), skip);
	Ok(raw.chunks_exact(bps).map(|s| format.decode(s)).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use std::path::PathBuf;

	fn temp_file(name:&str, bytes:&[u8]) -> PathBuf {
		let path = std::env::temp_dir().join(format!("pcps_acq_{}_{}.bin", name, std::process::id()));
		let mut f = File::create(&path).unwrap();
		f.write_all(bytes).unwrap();
		path
	}

	#[test]
	fn real_bytes() {
		let path = temp_file("i8", &[1u8, 0xFF, 3, 0x80, 5, 6]);
		let data = read_if_data(&path, 1.0, SampleFormat::I8, 3.0, 1.0).unwrap();
		assert_eq!(data, vec![Complex{ re: -1.0, im: 0.0 }, Complex{ re: 3.0, im: 0.0 }, Complex{ re: -128.0, im: 0.0 }]);

		let all = read_if_data(&path, 1.0, SampleFormat::I8, 0.0, 0.0).unwrap();
		assert_eq!(all.len(), 6);
		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn byte_pairs_conjugate_quadrature() {
		let path = temp_file("i8iq", &[1u8, 2, 0xFD, 0xFC, 7]);
		let data = read_if_data(&path, 1.0, SampleFormat::I8IQ, 0.0, 0.0).unwrap();
		// The dangling byte is not a whole sample
		assert_eq!(data, vec![Complex{ re: 1.0, im: -2.0 }, Complex{ re: -3.0, im: 4.0 }]);
		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn little_endian_shorts() {
		let mut bytes = vec![0u8; 8];
		LittleEndian::write_i16(&mut bytes[0..2], 1000);
		LittleEndian::write_i16(&mut bytes[2..4], -2000);
		LittleEndian::write_i16(&mut bytes[4..6], -1);
		LittleEndian::write_i16(&mut bytes[6..8], 32767);
		let path = temp_file("i16iq", &bytes);

		let data = read_if_data(&path, 2.0, SampleFormat::I16IQ, 0.5, 0.5).unwrap();
		assert_eq!(data, vec![Complex{ re: -1.0, im: 32767.0 }]);
		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn short_file_is_an_error() {
		let path = temp_file("short", &[0u8; 10]);
		match read_if_data(&path, 1.0, SampleFormat::I8IQ, 10.0, 0.0) {
			Err(AcqErr::ShortRead{ needed, got }) => assert_eq!((needed, got), (10, 5)),
			other => panic!("Unexpected {:?}", other),
		}
		assert!(matches!(read_if_data(&path, 1.0, SampleFormat::I8, 1.0, 50.0), Err(AcqErr::ShortRead{ needed: 1, got: 0 })));
		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn missing_file() {
		let ans = read_if_data("/nonexistent/pcps_acq.bin", 1.0e6, SampleFormat::I8, 0.0, 0.0);
		assert!(matches!(ans, Err(AcqErr::Io(_))));
	}

	#[test]
	fn format_names() {
		assert_eq!("i16iq".parse::<SampleFormat>().unwrap(), SampleFormat::I16IQ);
		assert_eq!("I8IQ".parse::<SampleFormat>().unwrap(), SampleFormat::I8IQ);
		assert!("f32".parse::<SampleFormat>().is_err());
	}

}
