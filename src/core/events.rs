//! Event timestamps and their validation.
//!
//! Everything downstream of this module works on [`SortedEvents`]: an
//! ascending sequence of at least two distinct integer timestamps whose span
//! fits in a signed 64-bit difference.

use crate::error::{PeriodError, Result};
use chrono::{DateTime, Utc};

/// Minimum number of distinct events needed to observe a gap.
pub const MIN_EVENTS: usize = 2;

/// Preprocessing applied to raw events before estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Caller asserts the events are already in ascending order.
    ///
    /// The assertion is verified; out-of-order input is rejected instead of
    /// producing meaningless gaps.
    pub assume_sorted: bool,
    /// Collapse duplicate timestamps.
    pub dedupe: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            assume_sorted: false,
            dedupe: true,
        }
    }
}

/// An ascending sequence of distinct event timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedEvents {
    events: Vec<i64>,
}

impl SortedEvents {
    /// Validate, sort and deduplicate raw events.
    ///
    /// # Errors
    /// * [`PeriodError::UnsortedInput`] - `assume_sorted` is set but the input descends
    /// * [`PeriodError::EmptyData`] - no events
    /// * [`PeriodError::InsufficientData`] - a single (distinct) event
    /// * [`PeriodError::DuplicateEvent`] - repeated timestamps with `dedupe` off
    /// * [`PeriodError::SpanOverflow`] - last minus first does not fit in `i64`
    pub fn prepare(events: &[i64], options: PrepareOptions) -> Result<Self> {
        let mut sorted = events.to_vec();

        if options.assume_sorted {
            if let Some(pos) = sorted.windows(2).position(|w| w[1] < w[0]) {
                return Err(PeriodError::UnsortedInput { index: pos + 1 });
            }
        } else {
            sorted.sort_unstable();
        }

        if options.dedupe {
            sorted.dedup();
        }

        match sorted.len() {
            0 => return Err(PeriodError::EmptyData),
            1 => {
                return Err(PeriodError::InsufficientData {
                    needed: MIN_EVENTS,
                    got: 1,
                })
            }
            _ => {}
        }

        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(PeriodError::DuplicateEvent { value: w[0] });
        }

        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        if last.checked_sub(first).is_none() {
            return Err(PeriodError::SpanOverflow);
        }

        Ok(Self { events: sorted })
    }

    /// Number of distinct events (always at least [`MIN_EVENTS`]).
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.events
    }

    /// The earliest event, used as the anchor for differences.
    pub fn first(&self) -> i64 {
        self.events[0]
    }

    pub fn last(&self) -> i64 {
        self.events[self.events.len() - 1]
    }

    /// Distance between the earliest and latest event.
    pub fn span(&self) -> u64 {
        // Bounded by i64::MAX, checked in `prepare`.
        (self.last() - self.first()) as u64
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.events
    }
}

/// Convert floating point timestamps to integer events.
///
/// Every value must be finite, integral and representable as `i64`;
/// nothing is rounded.
///
/// # Errors
/// [`PeriodError::InputType`] naming the first offending index.
pub fn events_from_f64(values: &[f64]) -> Result<Vec<i64>> {
    // 2^63, the first float above i64::MAX.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    values
        .iter()
        .enumerate()
        .map(|(index, &v)| {
            if !v.is_finite() {
                return Err(PeriodError::InputType {
                    index,
                    reason: format!("{} is not a finite number", v),
                });
            }
            if v.fract() != 0.0 {
                return Err(PeriodError::InputType {
                    index,
                    reason: format!("{} is not an integer", v),
                });
            }
            if v < i64::MIN as f64 || v >= UPPER {
                return Err(PeriodError::InputType {
                    index,
                    reason: format!("{} is outside the i64 range", v),
                });
            }
            Ok(v as i64)
        })
        .collect()
}

/// Convert datetimes to integer events at second resolution.
///
/// Sub-second parts are rounded to the nearest second, half up.
pub fn events_from_datetimes(timestamps: &[DateTime<Utc>]) -> Vec<i64> {
    timestamps
        .iter()
        .map(|t| (t.timestamp_millis() + 500).div_euclid(1000))
        .collect()
}
