//! Approximate GCD voting.
//!
//! For every unordered pair of anchor differences `(d_i, d_j)` and every
//! offset pair `(r_i, r_j)` from the noise interval, `g = gcd(d_i + r_i,
//! d_j + r_j)` is a candidate period. Candidates at least as large as the
//! smallest observed gap receive one vote each.
//!
//! A true period `p` divides the noise-free differences, so for some offset
//! pair the perturbed operands are exact multiples of `p` and `p` collects
//! votes across many pairs. Divisors produced by jitter are pair-specific and
//! stay rare. The histogram mode is therefore the dominant period.
//!
//! Cost is `C(N-1, 2) * width²` GCD evaluations. Rows of the pair triangle
//! (all pairs sharing a first index) are independent, so the parallel voter
//! gives each worker a private histogram and merges them at the end.

use super::histogram::PeriodHistogram;
use super::noise::NoiseInterval;
use crate::utils::{gcd, pair_count};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pairwise approximate GCD voter over a fixed set of anchor differences.
#[derive(Debug, Clone)]
pub struct ApproxGCDVoter<'a> {
    differences: &'a [u64],
    noise: NoiseInterval,
    min_period: u64,
}

impl<'a> ApproxGCDVoter<'a> {
    /// Create a voter.
    ///
    /// # Arguments
    /// * `differences` - Anchor differences
    /// * `noise` - Offsets applied to each operand
    /// * `min_period` - Admission floor for candidates (`tmin`)
    pub fn new(differences: &'a [u64], noise: NoiseInterval, min_period: u64) -> Self {
        Self {
            differences,
            noise,
            min_period,
        }
    }

    /// Number of difference pairs examined.
    pub fn pair_count(&self) -> u64 {
        pair_count(self.differences.len())
    }

    /// Number of GCD evaluations a full vote performs.
    pub fn candidate_count(&self) -> u64 {
        self.pair_count().saturating_mul(self.noise.combinations())
    }

    /// Vote over all pairs on the calling thread.
    pub fn vote(&self) -> PeriodHistogram {
        let mut histogram = PeriodHistogram::new();
        for row in 0..self.differences.len() {
            self.vote_row(row, &mut histogram);
        }
        histogram
    }

    /// Vote with rows of the pair triangle spread across the voting pool.
    ///
    /// Produces exactly the histogram [`ApproxGCDVoter::vote`] produces.
    #[cfg(feature = "parallel")]
    pub fn vote_parallel(&self) -> PeriodHistogram {
        crate::utils::parallel::install(|| {
            (0..self.differences.len())
                .into_par_iter()
                .fold(PeriodHistogram::new, |mut histogram, row| {
                    self.vote_row(row, &mut histogram);
                    histogram
                })
                .reduce(PeriodHistogram::new, |a, b| {
                    tracing::trace!(left = a.len(), right = b.len(), "merging partial histograms");
                    a.merge(b)
                })
        })
    }

    /// Without the `parallel` feature this is [`ApproxGCDVoter::vote`].
    #[cfg(not(feature = "parallel"))]
    pub fn vote_parallel(&self) -> PeriodHistogram {
        self.vote()
    }

    /// Vote all pairs `(row, j)` with `j > row`.
    fn vote_row(&self, row: usize, histogram: &mut PeriodHistogram) {
        let m = self.differences.len();
        if row + 1 >= m {
            return;
        }

        let width = self.noise.width();
        let per_pair = self.noise.combinations();
        let d_i = self.differences[row];
        let mut ordinal = self.row_start(row).saturating_mul(per_pair);

        for &d_j in &self.differences[row + 1..] {
            for r_i in self.noise.offsets() {
                let a = d_i + r_i;
                for r_j in self.noise.offsets() {
                    let g = gcd(a, d_j + r_j);
                    if g >= self.min_period {
                        histogram.record(g, ordinal + r_j);
                    }
                }
                ordinal = ordinal.saturating_add(width);
            }
        }

        histogram.add_enumerated(((m - row - 1) as u64).saturating_mul(per_pair));
    }

    /// Index of pair `(row, row + 1)` in lexicographic pair order.
    fn row_start(&self, row: usize) -> u64 {
        let m = self.differences.len() as u64;
        let i = row as u64;
        i * m - i * (i + 1) / 2
    }
}
