//! AGCD period estimator.
//!
//! Estimates the dominant period of sparse, jittered, possibly incomplete
//! integer event timestamps by approximate greatest common divisor voting.
//!
//! Reference: "AGCD: a robust periodicity analysis method based on
//! approximate greatest common divisor"
//!
//! # Example
//! ```
//! use agcd_period::detection::AGCD;
//!
//! // Period 20 with ±1 jitter.
//! let mut agcd = AGCD::new();
//! agcd.estimate_period(&[1, 19, 41, 65, 81, 99]).unwrap();
//! assert_eq!(agcd.best_period().unwrap(), 20);
//! ```

use super::differences::{anchor_differences, min_gap};
use super::histogram::{PeriodHistogram, TieBreak};
use super::noise::NoiseInterval;
use super::voting::ApproxGCDVoter;
use crate::core::{events_from_datetimes, events_from_f64, PrepareOptions, SortedEvents};
use crate::error::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Configuration for [`AGCD`] and [`estimate`].
#[derive(Debug, Clone, PartialEq)]
pub struct AGCDConfig {
    /// Caller asserts events are ascending (verified, not trusted).
    pub assume_sorted: bool,
    /// Collapse duplicate timestamps before estimation.
    pub dedupe: bool,
    /// Add each estimation's votes to the previous histogram instead of
    /// replacing it.
    pub accumulate: bool,
    /// Ordering among equally voted periods.
    pub tie_break: TieBreak,
    /// Use the partitioned voter for large inputs.
    pub parallel: bool,
    /// Minimum number of difference pairs before voting goes parallel.
    pub parallel_threshold: u64,
}

impl Default for AGCDConfig {
    fn default() -> Self {
        Self {
            assume_sorted: false,
            dedupe: true,
            accumulate: false,
            tie_break: TieBreak::FirstDiscovered,
            parallel: true,
            parallel_threshold: 2048,
        }
    }
}

impl AGCDConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that events are already sorted
    pub fn with_assume_sorted(mut self, assume_sorted: bool) -> Self {
        self.assume_sorted = assume_sorted;
        self
    }

    /// Enable or disable deduplication
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Keep votes across estimations
    pub fn with_accumulate(mut self, accumulate: bool) -> Self {
        self.accumulate = accumulate;
        self
    }

    /// Set tie-break rule
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Enable or disable parallel voting
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set pair count above which voting goes parallel
    pub fn with_parallel_threshold(mut self, pairs: u64) -> Self {
        self.parallel_threshold = pairs;
        self
    }

    fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            assume_sorted: self.assume_sorted,
            dedupe: self.dedupe,
        }
    }
}

/// Quantities derived while preparing and voting on one event sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationSummary {
    /// Distinct events after preprocessing.
    pub events: usize,
    /// Consecutive gaps (`events - 1`).
    pub gaps: usize,
    /// Smallest consecutive gap, also the admission floor for candidates.
    pub min_gap: u64,
    /// Jitter tolerance derived from `min_gap`.
    pub noise: NoiseInterval,
    /// Difference pairs examined.
    pub pairs: u64,
    /// Votes cast (candidates at or above `min_gap`).
    pub votes: u64,
    /// Whether the partitioned voter ran.
    pub parallel: bool,
}

/// Result of a single estimation: the vote histogram plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodEstimate {
    pub histogram: PeriodHistogram,
    pub summary: EstimationSummary,
    pub tie_break: TieBreak,
}

impl PeriodEstimate {
    /// Most voted candidate period.
    pub fn best_period(&self) -> Result<u64> {
        self.histogram.best_period(self.tie_break)
    }

    /// Entropy of the vote distribution in the given base.
    pub fn entropy(&self, base: f64) -> Result<f64> {
        self.histogram.entropy(base)
    }

    /// `(period, votes)` ordered strongest first.
    pub fn ranked(&self) -> Vec<(u64, u64)> {
        self.histogram.ranked(self.tie_break)
    }
}

/// Run one estimation and return a standalone result.
///
/// # Errors
/// Any preprocessing error from [`SortedEvents::prepare`]. Voting itself
/// cannot fail.
pub fn estimate(events: &[i64], config: &AGCDConfig) -> Result<PeriodEstimate> {
    let sorted = SortedEvents::prepare(events, config.prepare_options())?;

    let tmin = min_gap(&sorted);
    let noise = NoiseInterval::from_min_gap(tmin);
    let differences = anchor_differences(&sorted);

    let voter = ApproxGCDVoter::new(&differences, noise, tmin);
    let pairs = voter.pair_count();
    let parallel = config.parallel
        && crate::utils::parallel::parallel_enabled()
        && pairs >= config.parallel_threshold;

    debug!(
        events = sorted.len(),
        tmin,
        noise_width = noise.width(),
        pairs,
        parallel,
        "voting on approximate gcd candidates"
    );

    let histogram = if parallel {
        voter.vote_parallel()
    } else {
        voter.vote()
    };

    let summary = EstimationSummary {
        events: sorted.len(),
        gaps: differences.len(),
        min_gap: tmin,
        noise,
        pairs,
        votes: histogram.total_votes(),
        parallel,
    };

    debug!(
        candidates = histogram.len(),
        votes = summary.votes,
        "vote histogram complete"
    );

    Ok(PeriodEstimate {
        histogram,
        summary,
        tie_break: config.tie_break,
    })
}

/// Period estimator holding the vote histogram of the latest estimation.
///
/// Each call to [`AGCD::estimate_period`] replaces the histogram unless
/// [`AGCDConfig::accumulate`] is set. A failed estimation leaves the
/// histogram untouched.
#[derive(Debug, Clone, Default)]
pub struct AGCD {
    config: AGCDConfig,
    histogram: PeriodHistogram,
    last_summary: Option<EstimationSummary>,
}

impl AGCD {
    /// Create an estimator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AGCDConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AGCDConfig {
        &self.config
    }

    /// Build the vote histogram for `events`.
    ///
    /// # Errors
    /// * [`crate::PeriodError::EmptyData`] - no events
    /// * [`crate::PeriodError::InsufficientData`] - one distinct event
    /// * [`crate::PeriodError::UnsortedInput`] - declared sorted but is not
    /// * [`crate::PeriodError::DuplicateEvent`] - duplicates with dedupe off
    /// * [`crate::PeriodError::SpanOverflow`] - span exceeds `i64`
    pub fn estimate_period(&mut self, events: &[i64]) -> Result<EstimationSummary> {
        let estimate = estimate(events, &self.config)?;

        if self.config.accumulate {
            self.histogram.absorb(estimate.histogram);
        } else {
            self.histogram = estimate.histogram;
        }
        self.last_summary = Some(estimate.summary.clone());

        Ok(estimate.summary)
    }

    /// Estimate from floating point timestamps that must be integral.
    ///
    /// # Errors
    /// [`crate::PeriodError::InputType`] for a non-integral value, raised
    /// before any state changes, plus everything
    /// [`AGCD::estimate_period`] returns.
    pub fn estimate_period_f64(&mut self, values: &[f64]) -> Result<EstimationSummary> {
        let events = events_from_f64(values)?;
        self.estimate_period(&events)
    }

    /// Estimate from datetimes at second resolution.
    pub fn estimate_period_datetimes(
        &mut self,
        timestamps: &[DateTime<Utc>],
    ) -> Result<EstimationSummary> {
        self.estimate_period(&events_from_datetimes(timestamps))
    }

    /// Most voted candidate period.
    ///
    /// # Errors
    /// [`crate::PeriodError::EmptyHistogram`] before any successful
    /// estimation, or when every candidate fell below the admission floor.
    pub fn best_period(&self) -> Result<u64> {
        self.histogram.best_period(self.config.tie_break)
    }

    /// Shannon entropy of the vote distribution.
    pub fn entropy(&self, base: f64) -> Result<f64> {
        self.histogram.entropy(base)
    }

    /// Entropy in bits.
    pub fn binary_entropy(&self) -> Result<f64> {
        self.entropy(2.0)
    }

    /// `(period, votes)` ordered strongest first, for diagnostics.
    pub fn dump_histogram(&self) -> Vec<(u64, u64)> {
        self.histogram.ranked(self.config.tie_break)
    }

    pub fn histogram(&self) -> &PeriodHistogram {
        &self.histogram
    }

    /// Summary of the most recent successful estimation.
    pub fn last_summary(&self) -> Option<&EstimationSummary> {
        self.last_summary.as_ref()
    }

    /// Discard all votes.
    pub fn reset(&mut self) {
        self.histogram.clear();
        self.last_summary = None;
    }
}
