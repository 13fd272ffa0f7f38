
use super::surface::PowerSurface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
	pub value: f64,
	pub doppler_idx: usize,
	pub offset_idx: usize,
	pub cn0_db_hz: f64,
}

/// Global peak of the surface and the C/N0 it implies, using the surface mean as
/// the noise floor.  A surface with no positive mean power gives a C/N0 of zero,
/// which reads as "nothing here" without producing NaN or infinity.
pub fn peak_and_noise(surface:&PowerSurface, t:f64) -> Peak {
	let (value, (doppler_idx, offset_idx)) = surface.argmax().unwrap_or((0.0, (0, 0)));
	let mean:f64 = surface.mean();

	let cn0_db_hz:f64 = if mean > 0.0 {
		10.0 * ((value - mean) / mean / t).log10()
	} else {
		0.0
	};

	Peak{ value, doppler_idx, offset_idx, cn0_db_hz }
}

/// Sub-bin Doppler from the vertex of the parabola through the peak bin and its
/// two neighbors.  A peak on the edge of the grid is returned as is, and so is
/// one whose neighborhood doesn't curve downward.
pub fn refine_doppler(power:&[f64], doppler_bins:&[f64], peak_idx:usize) -> f64 {
	if peak_idx == 0 || peak_idx + 1 >= doppler_bins.len() {
		return doppler_bins[peak_idx];
	}

	let (x0, x1, x2) = (doppler_bins[peak_idx-1], doppler_bins[peak_idx], doppler_bins[peak_idx+1]);
	let (y0, y1, y2) = (power[peak_idx-1], power[peak_idx], power[peak_idx+1]);

	// a*f^2 + b*f + c through the three points
	let slope_lo:f64 = (y1 - y0) / (x1 - x0);
	let slope_hi:f64 = (y2 - y1) / (x2 - x1);
	let a:f64 = (slope_hi - slope_lo) / (x2 - x0);
	let b:f64 = slope_lo - a * (x0 + x1);

	if a < 0.0 { -b / (2.0 * a) } else { x1 }
}
