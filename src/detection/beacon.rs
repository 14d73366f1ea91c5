//! Per-key periodicity scan over grouped event records.
//!
//! Records such as `(source address, url)` keyed timestamps are grouped by
//! key, each group is estimated independently, and groups whose vote entropy
//! falls inside the configured bounds are reported with their dominant
//! period. Groups that cannot be estimated (fewer than two distinct events,
//! or no admissible candidate) are skipped rather than failing the scan.

use super::agcd::{estimate, AGCDConfig};
use crate::error::{PeriodError, Result};
use crate::features::is_valid_base;
use std::collections::BTreeMap;
use tracing::debug;

/// Group `(key, timestamp)` records into per-key event lists.
///
/// Timestamps keep their input order within a group.
pub fn group_events<K, I>(records: I) -> BTreeMap<K, Vec<i64>>
where
    K: Ord,
    I: IntoIterator<Item = (K, i64)>,
{
    let mut groups: BTreeMap<K, Vec<i64>> = BTreeMap::new();
    for (key, timestamp) in records {
        groups.entry(key).or_default().push(timestamp);
    }
    groups
}

/// Configuration for [`BeaconScan`].
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconScanConfig {
    /// Estimator settings applied to every group.
    pub estimator: AGCDConfig,
    /// Logarithm base for entropy.
    pub entropy_base: f64,
    /// Report only groups with entropy at least this value.
    pub min_entropy: Option<f64>,
    /// Report only groups with entropy at most this value.
    pub max_entropy: Option<f64>,
}

impl Default for BeaconScanConfig {
    fn default() -> Self {
        Self {
            estimator: AGCDConfig::default(),
            entropy_base: 2.0,
            min_entropy: None,
            max_entropy: None,
        }
    }
}

impl BeaconScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimator(mut self, estimator: AGCDConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_entropy_base(mut self, base: f64) -> Self {
        self.entropy_base = base;
        self
    }

    pub fn with_min_entropy(mut self, min: f64) -> Self {
        self.min_entropy = Some(min);
        self
    }

    pub fn with_max_entropy(mut self, max: f64) -> Self {
        self.max_entropy = Some(max);
        self
    }

    fn admits(&self, entropy: f64) -> bool {
        self.min_entropy.map_or(true, |min| entropy >= min)
            && self.max_entropy.map_or(true, |max| entropy <= max)
    }
}

/// A group with a detected dominant period.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconReport<K> {
    pub key: K,
    pub period: u64,
    pub entropy: f64,
    /// Distinct events in the group.
    pub events: usize,
    /// Votes for `period`.
    pub support: u64,
}

/// Outcome of scanning all groups.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconScanResult<K> {
    /// Groups within the entropy bounds, in key order.
    pub beacons: Vec<BeaconReport<K>>,
    /// Groups that could not be estimated, with the reason.
    pub skipped: Vec<(K, PeriodError)>,
    /// Groups estimated but outside the entropy bounds.
    pub filtered: usize,
}

impl<K> BeaconScanResult<K> {
    /// Number of groups examined.
    pub fn groups(&self) -> usize {
        self.beacons.len() + self.skipped.len() + self.filtered
    }
}

/// Scans grouped events for periodic behaviour.
#[derive(Debug, Clone, Default)]
pub struct BeaconScan {
    config: BeaconScanConfig,
}

impl BeaconScan {
    pub fn new(config: BeaconScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BeaconScanConfig {
        &self.config
    }

    /// Estimate every group.
    ///
    /// # Errors
    /// [`PeriodError::InvalidParameter`] if the entropy base is unusable.
    /// Per-group failures are collected in [`BeaconScanResult::skipped`].
    pub fn scan<K>(&self, groups: &BTreeMap<K, Vec<i64>>) -> Result<BeaconScanResult<K>>
    where
        K: Ord + Clone,
    {
        if !is_valid_base(self.config.entropy_base) {
            return Err(PeriodError::InvalidParameter(format!(
                "entropy base must be finite, positive and not 1, got {}",
                self.config.entropy_base
            )));
        }

        let mut result = BeaconScanResult {
            beacons: Vec::new(),
            skipped: Vec::new(),
            filtered: 0,
        };

        for (key, events) in groups {
            let estimate = match estimate(events, &self.config.estimator) {
                Ok(estimate) => estimate,
                Err(err) if !err.is_data_error() => return Err(err),
                Err(err) => {
                    debug!(error = %err, events = events.len(), "skipping event group");
                    result.skipped.push((key.clone(), err));
                    continue;
                }
            };

            let (period, entropy) = match (
                estimate.best_period(),
                estimate.entropy(self.config.entropy_base),
            ) {
                (Ok(period), Ok(entropy)) => (period, entropy),
                (Err(err), _) | (_, Err(err)) => {
                    debug!(error = %err, "no admissible period in event group");
                    result.skipped.push((key.clone(), err));
                    continue;
                }
            };

            if !self.config.admits(entropy) {
                result.filtered += 1;
                continue;
            }

            result.beacons.push(BeaconReport {
                key: key.clone(),
                period,
                entropy,
                events: estimate.summary.events,
                support: estimate.histogram.count(period).unwrap_or(0),
            });
        }

        debug!(
            beacons = result.beacons.len(),
            skipped = result.skipped.len(),
            filtered = result.filtered,
            "beacon scan complete"
        );

        Ok(result)
    }

    /// Group records by key and scan them.
    pub fn scan_records<K, I>(&self, records: I) -> Result<BeaconScanResult<K>>
    where
        K: Ord + Clone,
        I: IntoIterator<Item = (K, i64)>,
    {
        self.scan(&group_events(records))
    }
}
