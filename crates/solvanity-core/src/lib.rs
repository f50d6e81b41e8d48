//! Solvanity Core Engine
//!
//! The concurrent vanity search: a fixed pool of worker threads racing to
//! find a matching address, coordinated through cooperative pause/resume and
//! cancellation, with live throughput measurement.

mod control;
mod engine;
mod generator;
mod stats;
mod worker;

pub use control::SearchControl;
pub use engine::{SearchEngine, SearchError, SearchOutcome};
pub use generator::{Candidate, CandidateGenerator, GeneratorError, SolanaGenerator};
pub use stats::{format_count, format_duration, ProgressUpdate, SearchStatus};

// Re-exports for convenience
pub use solvanity_crypto::Keypair;
pub use solvanity_pattern::{estimate, EstimateReport, PatternError, PatternSpec};
