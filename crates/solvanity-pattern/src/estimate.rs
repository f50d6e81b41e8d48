//! Search cost estimation for vanity patterns

use serde::{Deserialize, Serialize};

use crate::matcher::{PatternSpec, ALPHABET_SIZE, BASE58_ALPHABET};

/// Baseline attempts per worker per second on average hardware, used when no
/// observed throughput is available.
pub const BASE_ATTEMPTS_PER_WORKER: f64 = 150_000.0;

/// Upfront feasibility and cost report for a pattern.
///
/// Advisory only: it never gates correctness, just lets the caller warn the
/// user or abort before committing resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Mean attempts until a match (geometric distribution), infinite for an
    /// invalid pattern.
    pub expected_attempts: f64,
    /// 58^len combinations, 0 for the empty pattern, `None` when the pattern
    /// contains a character outside the alphabet. Saturates at `u64::MAX`
    /// for patterns longer than 10 characters.
    pub possible_combinations: Option<u64>,
    /// Expected wall-clock seconds at the assumed throughput.
    pub estimated_seconds: f64,
}

impl EstimateReport {
    /// Whether the pattern contained a character outside the Base58 alphabet.
    /// Callers must refuse to start a search when this is set.
    pub fn is_invalid(&self) -> bool {
        self.possible_combinations.is_none()
    }

    fn invalid() -> Self {
        Self {
            expected_attempts: f64::INFINITY,
            possible_combinations: None,
            estimated_seconds: f64::INFINITY,
        }
    }
}

/// Estimate search cost at the baseline per-worker throughput.
pub fn estimate(spec: &PatternSpec, worker_count: usize) -> EstimateReport {
    estimate_with_throughput(spec, worker_count, BASE_ATTEMPTS_PER_WORKER)
}

/// Estimate search cost for a pattern, pure and deterministic.
///
/// Each pattern character matches with probability 1/58, so the expected
/// attempt count is 58^len. Longer patterns carry a minor per-attempt
/// overhead, modelled as a 1% slowdown per character bounded below at 95%
/// of the baseline rate.
pub fn estimate_with_throughput(
    spec: &PatternSpec,
    worker_count: usize,
    per_worker_rate: f64,
) -> EstimateReport {
    for c in spec.prefix.chars().chain(spec.suffix.chars()) {
        if !BASE58_ALPHABET.contains(c) {
            return EstimateReport::invalid();
        }
    }

    let pattern_len = spec.len();
    let possible_combinations = if pattern_len == 0 {
        0
    } else {
        (ALPHABET_SIZE as u64)
            .checked_pow(pattern_len as u32)
            .unwrap_or(u64::MAX)
    };

    let expected_attempts = (ALPHABET_SIZE as f64).powi(pattern_len as i32);

    let length_penalty = (1.0 - pattern_len as f64 * 0.01).max(0.95);
    let adjusted_rate = per_worker_rate * worker_count as f64 * length_penalty;
    let estimated_seconds = if adjusted_rate > 0.0 {
        expected_attempts / adjusted_rate
    } else {
        f64::INFINITY
    };

    EstimateReport {
        expected_attempts,
        possible_combinations: Some(possible_combinations),
        estimated_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations_grow_with_length() {
        let one = estimate(&PatternSpec::prefix("A"), 1);
        assert_eq!(one.possible_combinations, Some(58));
        assert_eq!(one.expected_attempts, 58.0);

        let three = estimate(&PatternSpec::new("AB", "c", true), 1);
        assert_eq!(three.possible_combinations, Some(58u64.pow(3)));
        assert_eq!(three.expected_attempts, 58f64.powi(3));
    }

    #[test]
    fn test_empty_pattern_is_trivial() {
        let report = estimate(&PatternSpec::new("", "", true), 4);
        assert_eq!(report.possible_combinations, Some(0));
        assert_eq!(report.expected_attempts, 1.0);
        assert!(!report.is_invalid());
    }

    #[test]
    fn test_invalid_character_sentinel() {
        for n in 1..=8 {
            let report = estimate(&PatternSpec::prefix("s0l"), n);
            assert!(report.is_invalid());
            assert_eq!(report.possible_combinations, None);
            assert!(report.expected_attempts.is_infinite());
            assert!(report.estimated_seconds.is_infinite());
        }
    }

    #[test]
    fn test_more_workers_never_slower() {
        let spec = PatternSpec::prefix("Sol");
        let mut last = f64::INFINITY;
        for n in 1..=16 {
            let secs = estimate(&spec, n).estimated_seconds;
            assert!(secs <= last);
            last = secs;
        }
    }

    #[test]
    fn test_length_penalty_bounded() {
        // 20-char pattern would be an 80% penalty unbounded; the floor is 95%
        let spec = PatternSpec::prefix("a".repeat(20));
        let report = estimate(&spec, 1);
        let expected = 58f64.powi(20) / (BASE_ATTEMPTS_PER_WORKER * 0.95);
        assert!((report.estimated_seconds - expected).abs() < expected * 1e-12);
    }

    #[test]
    fn test_combinations_saturate() {
        // 58^12 overflows u64
        let spec = PatternSpec::prefix("a".repeat(12));
        let report = estimate(&spec, 1);
        assert_eq!(report.possible_combinations, Some(u64::MAX));
        assert!(report.expected_attempts.is_finite());
    }

    #[test]
    fn test_observed_throughput_variant() {
        let spec = PatternSpec::prefix("A");
        let slow = estimate_with_throughput(&spec, 1, 1_000.0);
        let fast = estimate_with_throughput(&spec, 1, 1_000_000.0);
        assert!(slow.estimated_seconds > fast.estimated_seconds);
    }
}
