//! Integer arithmetic used by the voting loop.

/// Greatest common divisor of two unsigned integers.
///
/// Binary (Stein's) algorithm: shifts and subtractions only, which keeps the
/// innermost loop of the vote free of divisions. `gcd(0, x) == x`.
///
/// # Example
/// ```
/// use agcd_period::utils::gcd;
///
/// assert_eq!(gcd(48, 180), 12);
/// assert_eq!(gcd(0, 7), 7);
/// ```
#[inline]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }

    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();

    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            return a << shift;
        }
    }
}

/// Floor of the square root of `n`.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }

    // Float estimate, then correct the rounding error of the conversion.
    let mut r = (n as f64).sqrt() as u64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    r
}

/// Number of unordered pairs drawn without replacement from `n` items.
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}
