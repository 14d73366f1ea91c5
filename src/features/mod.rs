//! Summary features of period vote distributions.

pub mod entropy;

pub use entropy::{is_valid_base, normalized_entropy, shannon_entropy};
