
/// Correlation power over the Doppler (rows) by code offset (columns) search
/// space, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSurface {
	n_doppler: usize,
	n_offset: usize,
	power: Vec<f64>,
}

impl PowerSurface {

	pub fn zeros(n_doppler:usize, n_offset:usize) -> Self {
		PowerSurface{ n_doppler, n_offset, power: vec![0.0; n_doppler * n_offset] }
	}

	/// Panics if the rows don't all have the same length
	pub fn from_rows(rows:Vec<Vec<f64>>) -> Self {
		let n_doppler = rows.len();
		let n_offset = rows.first().map(|r| r.len()).unwrap_or(0);
		let mut power:Vec<f64> = Vec::with_capacity(n_doppler * n_offset);
		for row in rows {
			assert_eq!(row.len(), n_offset, "Ragged rows in power surface");
			power.extend(row);
		}
		PowerSurface{ n_doppler, n_offset, power }
	}

	pub fn n_doppler(&self) -> usize { self.n_doppler }
	pub fn n_offset(&self) -> usize { self.n_offset }
	pub fn shape(&self) -> (usize, usize) { (self.n_doppler, self.n_offset) }
	pub fn is_empty(&self) -> bool { self.power.is_empty() }

	pub fn get(&self, doppler_idx:usize, offset_idx:usize) -> f64 { self.power[doppler_idx*self.n_offset + offset_idx] }

	pub fn row(&self, doppler_idx:usize) -> &[f64] {
		let start = doppler_idx * self.n_offset;
		&self.power[start..(start + self.n_offset)]
	}

	/// Power across every Doppler bin at one code offset
	pub fn column(&self, offset_idx:usize) -> Vec<f64> {
		(0..self.n_doppler).map(|d| self.get(d, offset_idx)).collect()
	}

	pub fn as_slice(&self) -> &[f64] { &self.power }

	/// Non-coherent integration: elementwise sum of another surface of the same shape
	pub fn accumulate(&mut self, other:&PowerSurface) {
		assert_eq!(self.shape(), other.shape(), "Accumulating power surfaces of different shapes");
		for (a, b) in self.power.iter_mut().zip(other.power.iter()) {
			*a += b;
		}
	}

	pub fn scaled(&self, k:f64) -> PowerSurface {
		PowerSurface{ n_doppler: self.n_doppler, n_offset: self.n_offset, power: self.power.iter().map(|p| p * k).collect() }
	}

	pub fn mean(&self) -> f64 {
		if self.power.is_empty() { 0.0 }
		else { self.power.iter().sum::<f64>() / (self.power.len() as f64) }
	}

	/// Largest cell and its (Doppler, code offset) index; the first one wins on ties
	pub fn argmax(&self) -> Option<(f64, (usize, usize))> {
		let mut best:Option<(f64, usize)> = None;
		for (idx, p) in self.power.iter().enumerate() {
			match best {
				Some((b, _)) if b >= *p => {},
				_ => best = Some((*p, idx)),
			}
		}
		best.map(|(p, idx)| (p, (idx / self.n_offset, idx % self.n_offset)))
	}

}

#[cfg(test)]
mod tests {
	use super::*;

	fn ramp(n_doppler:usize, n_offset:usize, k:f64) -> PowerSurface {
		PowerSurface::from_rows((0..n_doppler).map(|d| {
			(0..n_offset).map(|o| k * ((d * n_offset + o) as f64).sqrt()).collect()
		}).collect())
	}

	#[test]
	fn indexing() {
		let s = PowerSurface::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 9.0, 6.0]]);
		assert_eq!(s.shape(), (2, 3));
		assert_eq!(s.get(1, 1), 9.0);
		assert_eq!(s.row(1), &[4.0, 9.0, 6.0]);
		assert_eq!(s.column(2), vec![3.0, 6.0]);
		assert_eq!(s.argmax(), Some((9.0, (1, 1))));
		assert_eq!(s.mean(), 25.0 / 6.0);
	}

	#[test]
	fn accumulation_order_does_not_matter() {
		let parts:Vec<PowerSurface> = (1..=7).map(|k| ramp(5, 11, 0.1 * (k as f64))).collect();

		let mut forward = PowerSurface::zeros(5, 11);
		for p in parts.iter() { forward.accumulate(p); }

		let mut backward = PowerSurface::zeros(5, 11);
		for p in parts.iter().rev() { backward.accumulate(p); }

		// Pairwise, the way a parallel reduction might combine them
		let mut left = PowerSurface::zeros(5, 11);
		let mut right = PowerSurface::zeros(5, 11);
		for (i, p) in parts.iter().enumerate() {
			if i % 2 == 0 { left.accumulate(p); } else { right.accumulate(p); }
		}
		right.accumulate(&left);

		for ((a, b), c) in forward.as_slice().iter().zip(backward.as_slice()).zip(right.as_slice()) {
			assert!((a - b).abs() <= 1.0e-12 * a.abs().max(1.0));
			assert!((a - c).abs() <= 1.0e-12 * a.abs().max(1.0));
		}
	}

	#[test]
	#[should_panic]
	fn shape_mismatch_panics() {
		let mut a = PowerSurface::zeros(2, 3);
		a.accumulate(&PowerSurface::zeros(3, 2));
	}

	#[test]
	fn empty_surface() {
		let s = PowerSurface::zeros(0, 0);
		assert!(s.is_empty());
		assert_eq!(s.argmax(), None);
		assert_eq!(s.mean(), 0.0);
	}

}
