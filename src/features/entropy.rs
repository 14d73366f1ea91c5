//! Entropy-based features for vote distributions.
//!
//! Provides information-theoretic measures over discrete count data.

/// Returns the Shannon entropy of a distribution given as raw counts.
///
/// Counts are normalized to probabilities `p_k = c_k / Σc` and the entropy
/// `-Σ p_k log_base(p_k)` is returned. Zero counts contribute nothing.
///
/// Returns NaN for an empty or all-zero input, or for a base that is not a
/// finite positive number other than 1.
///
/// # Arguments
/// * `counts` - Occurrence counts per category
/// * `base` - Logarithm base (2 for bits, e for nats)
///
/// # Example
/// ```
/// use agcd_period::features::shannon_entropy;
///
/// let h = shannon_entropy(&[1, 1, 1, 1], 2.0);
/// assert!((h - 2.0).abs() < 1e-12);
/// ```
pub fn shannon_entropy(counts: &[u64], base: f64) -> f64 {
    if !is_valid_base(base) {
        return f64::NAN;
    }

    let total: u64 = counts.iter().sum();
    if total == 0 {
        return f64::NAN;
    }

    let n = total as f64;
    let mut entropy = 0.0;

    for &count in counts {
        if count > 0 {
            let p = count as f64 / n;
            entropy -= p * p.ln();
        }
    }

    entropy / base.ln()
}

/// Returns the Shannon entropy normalized by its maximum, `log(k)` for `k`
/// non-zero categories.
///
/// 0 means all mass sits on one category, 1 means a perfectly flat
/// distribution. A single category yields 0.
pub fn normalized_entropy(counts: &[u64]) -> f64 {
    let categories = counts.iter().filter(|&&c| c > 0).count();
    if categories == 0 {
        return f64::NAN;
    }
    if categories == 1 {
        return 0.0;
    }

    shannon_entropy(counts, std::f64::consts::E) / (categories as f64).ln()
}

/// Whether `base` can be used as a logarithm base.
pub fn is_valid_base(base: f64) -> bool {
    base.is_finite() && base > 0.0 && base != 1.0
}
