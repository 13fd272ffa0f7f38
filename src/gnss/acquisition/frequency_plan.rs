
use crate::AcqErr;
use crate::gnss::SignalType;

// Absorbs the rounding in dop_step / t so that a range which is an exact multiple
// of the step doesn't pick up an extra bin past max_dop
const BIN_COUNT_EPS:f64 = 1.0e-9;

/// Doppler frequencies [Hz] to search, spaced dop_step / t apart from -max_dop up
/// to the first bin at or past max_dop.  The grid is generated over the half-open
/// range [-max_dop, max_dop + step), so the last bin can land up to one step
/// beyond max_dop when 2*max_dop isn't a multiple of the step.
pub fn doppler_bins(t:f64, max_dop:f64, dop_step:f64) -> Result<Vec<f64>, AcqErr> {
	if !(t > 0.0) { return Err(AcqErr::InvalidCodeCycle(t)); }
	if !(max_dop >= 0.0) || !(dop_step > 0.0) {
		return Err(AcqErr::InvalidDopplerRange{ max_dop, dop_step });
	}

	let step:f64 = dop_step / t;
	let n_bins:usize = (((2.0 * max_dop) + step) / step - BIN_COUNT_EPS).ceil().max(1.0) as usize;

	Ok((0..n_bins).map(|idx| -max_dop + (idx as f64) * step).collect())
}

/// Move the IF to the carrier of the given FDMA channel.  CDMA signals are returned unchanged.
pub fn shift_center_frequency(signal:SignalType, channel:i32, fi:f64) -> f64 {
	match signal.fdma_channel_spacing_hz() {
		Some(spacing) => fi + spacing * (channel as f64),
		None          => fi,
	}
}
