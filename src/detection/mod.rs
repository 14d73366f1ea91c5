//! Period detection for integer event timestamps.
//!
//! This module provides:
//! - Jitter tolerance derivation ([`NoiseInterval`])
//! - Gap and anchor-difference extraction
//! - Approximate GCD voting ([`ApproxGCDVoter`])
//! - Vote histogram statistics ([`PeriodHistogram`])
//! - The [`AGCD`] estimator and a keyed [`BeaconScan`]

mod agcd;
mod beacon;
mod differences;
mod histogram;
mod noise;
mod voting;

pub use agcd::{estimate, AGCDConfig, EstimationSummary, PeriodEstimate, AGCD};
pub use beacon::{
    group_events, BeaconReport, BeaconScan, BeaconScanConfig, BeaconScanResult,
};
pub use differences::{anchor_differences, consecutive_gaps, min_gap};
pub use histogram::{HistogramReport, PeriodHistogram, TieBreak, Vote};
pub use noise::NoiseInterval;
pub use voting::ApproxGCDVoter;

/// Estimate the dominant period of `events` with the default configuration.
///
/// Convenience wrapper returning the best period and its entropy in bits.
pub fn detect_period(events: &[i64]) -> crate::Result<(u64, f64)> {
    let estimate = estimate(events, &AGCDConfig::default())?;
    Ok((estimate.best_period()?, estimate.entropy(2.0)?))
}
