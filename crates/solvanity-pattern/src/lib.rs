//! Solvanity Pattern Engine
//!
//! Prefix/suffix matching over Base58 addresses plus search cost estimation.

mod estimate;
mod matcher;

pub use estimate::{estimate, estimate_with_throughput, EstimateReport, BASE_ATTEMPTS_PER_WORKER};
pub use matcher::{PatternError, PatternSpec, ALPHABET_SIZE, BASE58_ALPHABET};
