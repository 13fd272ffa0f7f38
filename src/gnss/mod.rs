
/// This module contains the parallel code search used to acquire GNSS signals
pub mod acquisition;

/// This module contains the spreading codes the acquisition searches for
pub mod code;

pub mod signal;

pub use self::signal::SignalType;
