//! Progress reporting types and display helpers

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of speed samples kept for the "recent speed" estimate.
const RECENCY_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    Running,
    Paused,
}

/// One aggregated progress snapshot, produced after each telemetry event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub status: SearchStatus,
    /// Aggregate attempts/s over the recency window
    pub recent_speed: f64,
    /// Lifetime attempts/s (total over un-paused elapsed time)
    pub average_speed: f64,
    pub total_attempts: u64,
    /// Elapsed time excluding paused duration
    pub elapsed: Duration,
    /// Estimated seconds remaining at the current recent speed
    pub eta_seconds: f64,
}

/// Bounded recency buffer of per-worker speed samples.
#[derive(Debug, Default)]
pub(crate) struct SpeedWindow {
    samples: VecDeque<f64>,
}

impl SpeedWindow {
    pub fn push(&mut self, attempts: u64, window_secs: f64) {
        if window_secs <= 0.0 {
            return;
        }
        if self.samples.len() == RECENCY_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(attempts as f64 / window_secs);
    }

    /// Arithmetic mean of the retained samples, attempts/s per worker.
    pub fn recent(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Format an attempt count with a metric suffix.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000_000_000 {
        format!("{:.2}T", count as f64 / 1e12)
    } else if count >= 1_000_000_000 {
        format!("{:.2}G", count as f64 / 1e9)
    } else if count >= 1_000_000 {
        format!("{:.2}M", count as f64 / 1e6)
    } else if count >= 1000 {
        format!("{:.2}K", count as f64 / 1e3)
    } else {
        format!("{}", count)
    }
}

/// Format a duration in seconds as a short human-readable string.
pub fn format_duration(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "now".to_string();
    }
    if seconds.is_infinite() {
        return "forever".to_string();
    }
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.0}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.0}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    }
}
