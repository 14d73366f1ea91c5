//! Candidate-period vote histogram and its statistics.

use crate::error::{PeriodError, Result};
use crate::features::{is_valid_base, shannon_entropy};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Tally for one candidate period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    /// Number of perturbed pairs whose GCD equalled the period.
    pub count: u64,
    /// Position in the canonical enumeration of the first such pair.
    pub first_seen: u64,
}

/// Secondary ordering among periods with equal vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Prefer the period produced first when pairs are enumerated in index
    /// order and offsets in ascending order.
    #[default]
    FirstDiscovered,
    /// Prefer the smaller period.
    SmallestPeriod,
}

impl TieBreak {
    /// Ranking order: more votes first, then by the tie-break rule.
    pub fn compare(&self, a: (u64, &Vote), b: (u64, &Vote)) -> Ordering {
        b.1.count.cmp(&a.1.count).then_with(|| match self {
            TieBreak::FirstDiscovered => a
                .1
                .first_seen
                .cmp(&b.1.first_seen)
                .then_with(|| a.0.cmp(&b.0)),
            TieBreak::SmallestPeriod => a.0.cmp(&b.0),
        })
    }
}

/// Mapping from candidate period to accumulated votes.
///
/// Only ever grows during an estimation. Parallel partitions build private
/// histograms that are combined with [`PeriodHistogram::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodHistogram {
    votes: HashMap<u64, Vote>,
    /// Candidates enumerated (admitted or not) while building this histogram.
    enumerated: u64,
}

impl PeriodHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one vote for `period`, found at enumeration position `ordinal`.
    #[inline]
    pub fn record(&mut self, period: u64, ordinal: u64) {
        self.votes
            .entry(period)
            .and_modify(|v| {
                v.count += 1;
                v.first_seen = v.first_seen.min(ordinal);
            })
            .or_insert(Vote {
                count: 1,
                first_seen: ordinal,
            });
    }

    /// Note that `n` candidates were enumerated, whether or not admitted.
    pub(crate) fn add_enumerated(&mut self, n: u64) {
        self.enumerated = self.enumerated.saturating_add(n);
    }

    /// Combine two partial histograms over disjoint parts of the same
    /// enumeration. Commutative and associative.
    pub fn merge(mut self, other: PeriodHistogram) -> PeriodHistogram {
        if self.votes.len() < other.votes.len() {
            return other.merge(self);
        }
        for (period, vote) in other.votes {
            self.votes
                .entry(period)
                .and_modify(|v| {
                    v.count += vote.count;
                    v.first_seen = v.first_seen.min(vote.first_seen);
                })
                .or_insert(vote);
        }
        self.enumerated = self.enumerated.saturating_add(other.enumerated);
        self
    }

    /// Append the votes of a later, independent estimation.
    ///
    /// Discovery positions of `later` are shifted past everything already
    /// enumerated here, so earlier estimations win ties.
    pub fn absorb(&mut self, later: PeriodHistogram) {
        let shift = self.enumerated;
        for (period, vote) in later.votes {
            let shifted = vote.first_seen.saturating_add(shift);
            self.votes
                .entry(period)
                .and_modify(|v| v.count += vote.count)
                .or_insert(Vote {
                    count: vote.count,
                    first_seen: shifted,
                });
        }
        self.enumerated = self.enumerated.saturating_add(later.enumerated);
    }

    pub fn clear(&mut self) {
        self.votes.clear();
        self.enumerated = 0;
    }

    /// Number of distinct candidate periods.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Votes for `period`, if any.
    pub fn count(&self, period: u64) -> Option<u64> {
        self.votes.get(&period).map(|v| v.count)
    }

    pub fn vote(&self, period: u64) -> Option<&Vote> {
        self.votes.get(&period)
    }

    /// Sum of all vote counts.
    pub fn total_votes(&self) -> u64 {
        self.votes.values().map(|v| v.count).sum()
    }

    /// Candidates enumerated while building the histogram.
    pub fn enumerated(&self) -> u64 {
        self.enumerated
    }

    /// Smallest candidate period present.
    pub fn min_period(&self) -> Option<u64> {
        self.votes.keys().copied().min()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Vote)> + '_ {
        self.votes.iter().map(|(&p, v)| (p, v))
    }

    /// The candidate period with the most votes.
    ///
    /// # Errors
    /// [`PeriodError::EmptyHistogram`] if no votes were recorded.
    pub fn best_period(&self, tie_break: TieBreak) -> Result<u64> {
        self.iter()
            .min_by(|a, b| tie_break.compare(*a, *b))
            .map(|(period, _)| period)
            .ok_or(PeriodError::EmptyHistogram)
    }

    /// `(period, votes)` pairs ordered from strongest to weakest candidate.
    pub fn ranked(&self, tie_break: TieBreak) -> Vec<(u64, u64)> {
        let mut entries: Vec<(u64, &Vote)> = self.iter().collect();
        entries.sort_by(|a, b| tie_break.compare(*a, *b));
        entries.into_iter().map(|(p, v)| (p, v.count)).collect()
    }

    /// Shannon entropy of the normalized vote distribution.
    ///
    /// Low entropy means the votes concentrate on few periods.
    ///
    /// # Errors
    /// * [`PeriodError::InvalidParameter`] - `base` is not finite, positive and != 1
    /// * [`PeriodError::EmptyHistogram`] - no votes were recorded
    pub fn entropy(&self, base: f64) -> Result<f64> {
        if !is_valid_base(base) {
            return Err(PeriodError::InvalidParameter(format!(
                "entropy base must be finite, positive and not 1, got {}",
                base
            )));
        }
        if self.is_empty() {
            return Err(PeriodError::EmptyHistogram);
        }

        // Fixed summation order so equal histograms give bit-identical results.
        let mut entries: Vec<(u64, u64)> = self.iter().map(|(p, v)| (p, v.count)).collect();
        entries.sort_unstable_by_key(|&(p, _)| p);
        let counts: Vec<u64> = entries.into_iter().map(|(_, c)| c).collect();

        Ok(shannon_entropy(&counts, base))
    }

    /// Displayable listing in ranking order.
    pub fn report(&self, tie_break: TieBreak) -> HistogramReport<'_> {
        HistogramReport {
            histogram: self,
            tie_break,
        }
    }
}

/// One `g <period> count <votes>` line per candidate, strongest first.
#[derive(Debug, Clone, Copy)]
pub struct HistogramReport<'a> {
    histogram: &'a PeriodHistogram,
    tie_break: TieBreak,
}

impl fmt::Display for HistogramReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (period, count) in self.histogram.ranked(self.tie_break) {
            writeln!(f, "g {} count {}", period, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn histogram(entries: &[(u64, u64, u64)]) -> PeriodHistogram {
        let mut h = PeriodHistogram::new();
        for &(period, count, first_seen) in entries {
            for k in 0..count {
                h.record(period, first_seen + k * 1000);
            }
        }
        h
    }

    #[test]
    fn record_accumulates() {
        let mut h = PeriodHistogram::new();
        h.record(20, 7);
        h.record(20, 3);
        h.record(16, 5);
        assert_eq!(h.count(20), Some(2));
        assert_eq!(h.vote(20).unwrap().first_seen, 3);
        assert_eq!(h.count(16), Some(1));
        assert_eq!(h.count(17), None);
        assert_eq!(h.total_votes(), 3);
        assert_eq!(h.len(), 2);
        assert_eq!(h.min_period(), Some(16));
    }

    #[test]
    fn best_period_by_votes() {
        let h = histogram(&[(2, 9, 0), (4, 1, 5)]);
        assert_eq!(h.best_period(TieBreak::FirstDiscovered).unwrap(), 2);
        assert_eq!(h.best_period(TieBreak::SmallestPeriod).unwrap(), 2);
    }

    #[test]
    fn tie_break_rules_differ() {
        // 20 found before 16, both with three votes.
        let h = histogram(&[(20, 3, 24), (16, 3, 64), (18, 1, 51)]);
        assert_eq!(h.best_period(TieBreak::FirstDiscovered).unwrap(), 20);
        assert_eq!(h.best_period(TieBreak::SmallestPeriod).unwrap(), 16);
    }

    #[test]
    fn ranked_orders_strongest_first() {
        let h = histogram(&[(20, 3, 24), (16, 3, 64), (18, 1, 51), (33, 1, 89)]);
        assert_eq!(
            h.ranked(TieBreak::FirstDiscovered),
            vec![(20, 3), (16, 3), (18, 1), (33, 1)]
        );
        assert_eq!(
            h.ranked(TieBreak::SmallestPeriod),
            vec![(16, 3), (20, 3), (18, 1), (33, 1)]
        );
    }

    #[test]
    fn empty_histogram_statistics_fail() {
        let h = PeriodHistogram::new();
        assert_eq!(
            h.best_period(TieBreak::default()),
            Err(PeriodError::EmptyHistogram)
        );
        assert_eq!(h.entropy(2.0), Err(PeriodError::EmptyHistogram));
        assert!(h.ranked(TieBreak::default()).is_empty());
    }

    #[test]
    fn entropy_of_skewed_votes() {
        let h = histogram(&[(2, 9, 0), (4, 1, 5)]);
        assert_relative_eq!(h.entropy(2.0).unwrap(), 0.468_995_593_589_281_2, epsilon = 1e-12);
    }

    #[test]
    fn entropy_of_single_candidate_is_zero() {
        let h = histogram(&[(10, 4, 0)]);
        assert_relative_eq!(h.entropy(2.0).unwrap(), 0.0);
    }

    #[test]
    fn entropy_rejects_bad_base() {
        let h = histogram(&[(2, 9, 0), (4, 1, 5)]);
        assert!(matches!(h.entropy(1.0), Err(PeriodError::InvalidParameter(_))));
        assert!(matches!(h.entropy(0.0), Err(PeriodError::InvalidParameter(_))));
        assert!(matches!(h.entropy(f64::NAN), Err(PeriodError::InvalidParameter(_))));
    }

    #[test]
    fn merge_sums_counts_and_keeps_earliest() {
        let mut a = PeriodHistogram::new();
        a.record(10, 4);
        a.record(20, 9);
        a.add_enumerated(10);
        let mut b = PeriodHistogram::new();
        b.record(10, 2);
        b.record(30, 12);
        b.add_enumerated(5);

        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab, ba);
        assert_eq!(ab.count(10), Some(2));
        assert_eq!(ab.vote(10).unwrap().first_seen, 2);
        assert_eq!(ab.count(20), Some(1));
        assert_eq!(ab.count(30), Some(1));
        assert_eq!(ab.enumerated(), 15);
    }

    #[test]
    fn absorb_shifts_later_discoveries() {
        let mut earlier = PeriodHistogram::new();
        earlier.record(16, 3);
        earlier.add_enumerated(8);
        let mut later = PeriodHistogram::new();
        later.record(20, 0);
        later.record(16, 1);
        later.add_enumerated(4);

        earlier.absorb(later);
        assert_eq!(earlier.count(16), Some(2));
        assert_eq!(earlier.vote(16).unwrap().first_seen, 3);
        assert_eq!(earlier.vote(20).unwrap().first_seen, 8);
        assert_eq!(earlier.enumerated(), 12);
        assert_eq!(earlier.best_period(TieBreak::FirstDiscovered).unwrap(), 16);
    }

    #[test]
    fn clear_resets() {
        let mut h = histogram(&[(5, 2, 0)]);
        h.add_enumerated(3);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.enumerated(), 0);
    }

    #[test]
    fn report_lists_ranked_lines() {
        let h = histogram(&[(2, 9, 0), (4, 1, 5)]);
        let text = h.report(TieBreak::default()).to_string();
        assert_eq!(text, "g 2 count 9\ng 4 count 1\n");
    }
}
