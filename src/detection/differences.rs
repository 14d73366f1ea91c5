//! Gap and anchor-difference extraction from sorted events.

use crate::core::SortedEvents;

/// Consecutive inter-event gaps, `sorted[n] - sorted[n - 1]`.
pub fn consecutive_gaps(events: &SortedEvents) -> Vec<u64> {
    events
        .as_slice()
        .windows(2)
        .map(|w| (w[1] - w[0]) as u64)
        .collect()
}

/// Smallest consecutive gap (`tmin`).
///
/// Positive for any [`SortedEvents`], since events are distinct.
pub fn min_gap(events: &SortedEvents) -> u64 {
    events
        .as_slice()
        .windows(2)
        .map(|w| (w[1] - w[0]) as u64)
        .fold(u64::MAX, u64::min)
}

/// Offsets of every event after the first relative to the first.
///
/// Anchoring all differences on the earliest event keeps the pairwise search
/// at `C(N-1, 2)` pairs. The result is strictly ascending.
pub fn anchor_differences(events: &SortedEvents) -> Vec<u64> {
    let anchor = events.first();
    events.as_slice()[1..]
        .iter()
        .map(|&t| (t - anchor) as u64)
        .collect()
}
