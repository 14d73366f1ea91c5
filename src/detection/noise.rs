//! Jitter tolerance for approximate GCD voting.

use crate::utils::isqrt;

/// Set of non-negative offsets `{0, 1, ..., width - 1}` added to each GCD
/// operand to absorb timing jitter.
///
/// The width is `floor(sqrt(tmin))` where `tmin` is the smallest observed gap,
/// with a floor of one so the unperturbed operand is always tried. Taking the
/// square root keeps the two-operand search (`width²` combinations per pair)
/// sublinear in the gap size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseInterval {
    width: u64,
}

impl NoiseInterval {
    /// Build the interval from the minimum inter-event gap.
    ///
    /// # Example
    /// ```
    /// use agcd_period::detection::NoiseInterval;
    ///
    /// assert_eq!(NoiseInterval::from_min_gap(3).offsets().collect::<Vec<_>>(), vec![0]);
    /// assert_eq!(NoiseInterval::from_min_gap(16).offsets().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    /// ```
    pub fn from_min_gap(tmin: u64) -> Self {
        Self {
            width: isqrt(tmin).max(1),
        }
    }

    /// Offsets to apply, in ascending order starting at 0.
    pub fn offsets(&self) -> std::ops::Range<u64> {
        0..self.width
    }

    /// Number of offsets.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Largest offset applied.
    pub fn max_offset(&self) -> u64 {
        self.width - 1
    }

    /// Offset pairs tried per difference pair.
    pub fn combinations(&self) -> u64 {
        self.width.saturating_mul(self.width)
    }

    /// Whether only the unperturbed operand is tried.
    pub fn is_exact(&self) -> bool {
        self.width == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_gaps_give_exact_interval() {
        for tmin in 1..4 {
            let noise = NoiseInterval::from_min_gap(tmin);
            assert!(noise.is_exact(), "tmin = {}", tmin);
            assert_eq!(noise.offsets().collect::<Vec<_>>(), vec![0]);
            assert_eq!(noise.combinations(), 1);
        }
    }

    #[test]
    fn interval_grows_with_square_root() {
        assert_eq!(NoiseInterval::from_min_gap(4).width(), 2);
        assert_eq!(NoiseInterval::from_min_gap(8).width(), 2);
        assert_eq!(NoiseInterval::from_min_gap(9).width(), 3);
        assert_eq!(NoiseInterval::from_min_gap(16).max_offset(), 3);
        assert_eq!(NoiseInterval::from_min_gap(2000).width(), 44);
        assert_eq!(NoiseInterval::from_min_gap(2000).combinations(), 44 * 44);
    }

    #[test]
    fn zero_gap_still_tries_unperturbed() {
        let noise = NoiseInterval::from_min_gap(0);
        assert_eq!(noise.offsets().collect::<Vec<_>>(), vec![0]);
    }
}
