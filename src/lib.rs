//! # agcd-period
//!
//! Dominant period estimation for sparse, noisy, possibly incomplete integer
//! event timestamps using approximate greatest common divisor (AGCD) voting.
//!
//! Typical use is detecting periodic "beaconing" in network event logs, but
//! the estimator only sees a sequence of integers: any event source works.
//!
//! ```
//! use agcd_period::prelude::*;
//!
//! // Period 20 with one event missing.
//! let mut agcd = AGCD::new();
//! agcd.estimate_period(&[1, 19, 65, 81, 99, 142])?;
//! assert_eq!(agcd.best_period()?, 20);
//! # Ok::<(), PeriodError>(())
//! ```

#![allow(clippy::upper_case_acronyms)]

pub mod core;
pub mod detection;
pub mod error;
pub mod features;
pub mod utils;

pub use error::{PeriodError, Result};

pub mod prelude {
    pub use crate::core::{PrepareOptions, SortedEvents};
    pub use crate::detection::{
        detect_period, estimate, AGCDConfig, BeaconScan, BeaconScanConfig, PeriodHistogram,
        TieBreak, AGCD,
    };
    pub use crate::error::{PeriodError, Result};
}
