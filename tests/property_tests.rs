//! Property-based tests for the AGCD estimator.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated event sequences.

use agcd_period::detection::{estimate, AGCDConfig, PeriodEstimate, AGCD};
use agcd_period::PeriodError;
use proptest::prelude::*;

/// Strategy for raw event sequences, possibly unsorted and with duplicates.
fn events_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-100_000i64..100_000, min_len..max_len)
}

/// Strategy for noise-free periodic grids: `(events, period)`.
fn grid_strategy() -> impl Strategy<Value = (Vec<i64>, u64)> {
    (1u64..150, 3usize..12, -10_000i64..10_000).prop_map(|(period, n, offset)| {
        let events = (0..n as i64).map(|i| offset + period as i64 * i).collect();
        (events, period)
    })
}

fn run(events: &[i64], config: &AGCDConfig) -> Option<PeriodEstimate> {
    match estimate(events, config) {
        Ok(result) => Some(result),
        Err(PeriodError::InsufficientData { .. }) => None,
        Err(err) => panic!("unexpected error: {}", err),
    }
}

// =============================================================================
// Property: every candidate period is at least the smallest gap
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn histogram_keys_respect_min_gap(events in events_strategy(2, 40)) {
        if let Some(result) = run(&events, &AGCDConfig::default()) {
            let tmin = result.summary.min_gap;
            prop_assert!(tmin > 0);
            for (period, vote) in result.histogram.iter() {
                prop_assert!(period >= tmin, "period {} below tmin {}", period, tmin);
                prop_assert!(vote.count > 0);
            }
        }
    }

    #[test]
    fn histogram_keys_bounded_by_span(events in events_strategy(2, 40)) {
        if let Some(result) = run(&events, &AGCDConfig::default()) {
            let mut sorted = events.clone();
            sorted.sort_unstable();
            let span = (sorted[sorted.len() - 1] - sorted[0]) as u64;
            let bound = span + result.summary.noise.max_offset();
            for (period, _) in result.histogram.iter() {
                prop_assert!(period <= bound);
            }
        }
    }

    #[test]
    fn vote_total_matches_summary(events in events_strategy(2, 40)) {
        if let Some(result) = run(&events, &AGCDConfig::default()) {
            prop_assert_eq!(result.histogram.total_votes(), result.summary.votes);
            prop_assert!(result.summary.votes <= result.summary.pairs * result.summary.noise.combinations());
        }
    }
}

// =============================================================================
// Property: estimation is a pure function of its input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn independent_instances_are_identical(events in events_strategy(3, 40)) {
        let mut a = AGCD::new();
        let mut b = AGCD::new();
        let ra = a.estimate_period(&events);
        let rb = b.estimate_period(&events);
        prop_assert_eq!(&ra, &rb);

        prop_assert_eq!(a.histogram(), b.histogram());
        prop_assert_eq!(a.dump_histogram(), b.dump_histogram());
        prop_assert_eq!(a.best_period(), b.best_period());
        match (a.binary_entropy(), b.binary_entropy()) {
            (Ok(ea), Ok(eb)) => prop_assert_eq!(ea.to_bits(), eb.to_bits()),
            (ea, eb) => prop_assert_eq!(ea, eb),
        }
    }

    #[test]
    fn input_order_does_not_matter(events in events_strategy(3, 40)) {
        let mut reversed = events.clone();
        reversed.reverse();
        let forward = estimate(&events, &AGCDConfig::default());
        let backward = estimate(&reversed, &AGCDConfig::default());
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn asserted_sorted_matches_sorting(events in events_strategy(3, 40)) {
        let mut sorted = events.clone();
        sorted.sort_unstable();
        let config = AGCDConfig::default().with_assume_sorted(true);
        prop_assert_eq!(
            estimate(&sorted, &config),
            estimate(&events, &AGCDConfig::default())
        );
    }

    #[test]
    fn parallel_matches_serial(events in events_strategy(3, 60)) {
        let serial = AGCDConfig::default().with_parallel(false);
        let parallel = AGCDConfig::default().with_parallel_threshold(0);
        if let (Some(a), Some(b)) = (run(&events, &serial), run(&events, &parallel)) {
            prop_assert_eq!(&a.histogram, &b.histogram);
            prop_assert_eq!(a.best_period(), b.best_period());
        }
    }
}

// =============================================================================
// Property: statistics
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entropy_base_invariance(events in events_strategy(3, 30), base in 1.5f64..32.0) {
        if let Some(result) = run(&events, &AGCDConfig::default()) {
            if let Ok(bits) = result.entropy(2.0) {
                let other = result.entropy(base).unwrap();
                let expected = bits / base.log2();
                prop_assert!(
                    (other - expected).abs() <= 1e-9 * expected.abs().max(1.0),
                    "entropy({}) = {}, expected {}", base, other, expected
                );
                prop_assert!(bits >= 0.0);
                prop_assert!(bits <= (result.histogram.len() as f64).log2() + 1e-9);
            }
        }
    }

    #[test]
    fn best_period_has_most_votes(events in events_strategy(3, 30)) {
        if let Some(result) = run(&events, &AGCDConfig::default()) {
            if let Ok(best) = result.best_period() {
                let top = result.histogram.count(best).unwrap();
                prop_assert!(result.histogram.iter().all(|(_, v)| v.count <= top));
                prop_assert_eq!(result.ranked()[0], (best, top));
            }
        }
    }

    #[test]
    fn exact_grid_recovers_period((events, period) in grid_strategy()) {
        let result = estimate(&events, &AGCDConfig::default()).unwrap();
        prop_assert_eq!(result.best_period().unwrap(), period);
    }
}
