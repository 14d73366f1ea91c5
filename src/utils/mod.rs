//! Utility functions shared by the detection modules.

pub mod integer;
pub mod parallel;

pub use integer::{gcd, isqrt, pair_count};
