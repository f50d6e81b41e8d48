//! Vanity search coordinator

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use thiserror::Error;
use tracing::{info, warn};

use solvanity_pattern::{estimate, PatternSpec};

use crate::control::SearchControl;
use crate::generator::{Candidate, CandidateGenerator};
use crate::stats::{ProgressUpdate, SearchStatus, SpeedWindow};
use crate::worker::{spawn_worker, Telemetry};

/// How long the aggregator blocks on the telemetry channel before re-checking
/// the control flags. Keeps pause/cancel requests serviced without spinning.
const AGGREGATOR_TICK: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("pattern contains characters outside the Base58 alphabet")]
    InvalidPattern,
    #[error("at least one worker is required")]
    NoWorkers,
    #[error("all workers terminated without finding a match")]
    WorkersFailed,
}

/// Terminal result of a search session.
///
/// `elapsed` excludes time spent paused.
#[derive(Debug)]
pub enum SearchOutcome {
    Found {
        candidate: Candidate,
        total_attempts: u64,
        elapsed: Duration,
    },
    Cancelled {
        total_attempts: u64,
        elapsed: Duration,
    },
}

/// The search coordinator: owns the worker pool and aggregates its telemetry.
///
/// Workers share nothing but the caller-owned [`SearchControl`] flags and one
/// unbounded telemetry channel, so one worker's failure cannot corrupt
/// another's state. First match observed by the aggregator wins; a cancel
/// request observed before any match takes precedence.
pub struct SearchEngine {
    generator: Arc<dyn CandidateGenerator>,
    spec: PatternSpec,
    workers: usize,
}

impl SearchEngine {
    pub fn new(generator: Arc<dyn CandidateGenerator>, spec: PatternSpec, workers: usize) -> Self {
        Self {
            generator,
            spec,
            workers,
        }
    }

    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run the search to completion without observing progress.
    pub fn run(&self, control: &Arc<SearchControl>) -> Result<SearchOutcome, SearchError> {
        self.run_with_progress(control, |_| {})
    }

    /// Run the search, delivering a [`ProgressUpdate`] to `callback` after
    /// each telemetry event and on pause/resume transitions.
    ///
    /// Blocks until a match is found, the search is cancelled, or every
    /// worker has faulted. All workers are joined before returning.
    pub fn run_with_progress<F>(
        &self,
        control: &Arc<SearchControl>,
        mut callback: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&ProgressUpdate),
    {
        if self.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        let report = estimate(&self.spec, self.workers);
        if report.is_invalid() {
            return Err(SearchError::InvalidPattern);
        }
        let expected_attempts = report.expected_attempts;

        let (tx, rx) = unbounded();
        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                spawn_worker(
                    id,
                    Arc::clone(&self.generator),
                    self.spec.clone(),
                    Arc::clone(control),
                    tx.clone(),
                )
            })
            .collect();
        // The aggregator holds no sender: the channel disconnects once every
        // worker has exited.
        drop(tx);

        info!(
            workers = self.workers,
            prefix = %self.spec.prefix,
            suffix = %self.spec.suffix,
            case_sensitive = self.spec.case_sensitive,
            "vanity search started"
        );

        let started = Instant::now();
        let mut window = SpeedWindow::default();
        let mut total_attempts: u64 = 0;
        let mut alive = self.workers;
        let mut paused_total = Duration::ZERO;
        let mut pause_started: Option<Instant> = None;
        let mut found: Option<Candidate> = None;
        let mut cancelled = false;

        loop {
            // Cancel observed before a match wins the race.
            if control.is_cancelled() {
                cancelled = true;
                break;
            }

            // Track pause transitions; reported elapsed time excludes them.
            let was_paused = pause_started.is_some();
            match (control.is_paused(), pause_started) {
                (true, None) => pause_started = Some(Instant::now()),
                (false, Some(since)) => {
                    paused_total += since.elapsed();
                    pause_started = None;
                }
                _ => {}
            }
            if was_paused != pause_started.is_some() {
                let elapsed = Self::active_elapsed(started, paused_total, pause_started);
                callback(&Self::snapshot(
                    control,
                    &window,
                    self.workers,
                    total_attempts,
                    elapsed,
                    expected_attempts,
                ));
            }

            match rx.recv_timeout(AGGREGATOR_TICK) {
                Ok(Telemetry::Speed {
                    attempts,
                    window_secs,
                    ..
                }) => {
                    window.push(attempts, window_secs);
                    total_attempts += attempts;
                    let elapsed = Self::active_elapsed(started, paused_total, pause_started);
                    callback(&Self::snapshot(
                        control,
                        &window,
                        self.workers,
                        total_attempts,
                        elapsed,
                        expected_attempts,
                    ));
                }
                Ok(Telemetry::Found {
                    worker_id,
                    candidate,
                    attempts,
                }) => {
                    control.stop();
                    total_attempts += attempts;
                    info!(worker_id, address = %candidate.address, "match found");
                    found = Some(candidate);
                    break;
                }
                Ok(Telemetry::Fault { worker_id, error }) => {
                    alive -= 1;
                    warn!(worker_id, %error, remaining = alive, "worker faulted");
                    if alive == 0 {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Some(since) = pause_started.take() {
            paused_total += since.elapsed();
        }

        // Ensure every worker has actually stopped before returning.
        control.stop();
        for handle in handles {
            if handle.join().is_err() {
                warn!("worker panicked during shutdown");
            }
        }
        total_attempts += Self::drain(&rx, cancelled, &mut found);

        let elapsed = started.elapsed().saturating_sub(paused_total);
        if cancelled {
            info!(total_attempts, "search cancelled");
            return Ok(SearchOutcome::Cancelled {
                total_attempts,
                elapsed,
            });
        }
        match found {
            Some(candidate) => Ok(SearchOutcome::Found {
                candidate,
                total_attempts,
                elapsed,
            }),
            None => Err(SearchError::WorkersFailed),
        }
    }

    /// Fold the telemetry left behind by stopping workers into the total.
    /// Matches arriving after the outcome is decided are discarded
    /// (first-observed-wins).
    fn drain(rx: &Receiver<Telemetry>, cancelled: bool, found: &mut Option<Candidate>) -> u64 {
        let mut attempts_total = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                Telemetry::Speed { attempts, .. } => attempts_total += attempts,
                Telemetry::Found {
                    candidate,
                    attempts,
                    ..
                } => {
                    attempts_total += attempts;
                    if found.is_none() && !cancelled {
                        *found = Some(candidate);
                    }
                }
                Telemetry::Fault { .. } => {}
            }
        }
        attempts_total
    }

    fn active_elapsed(
        started: Instant,
        paused_total: Duration,
        pause_started: Option<Instant>,
    ) -> Duration {
        let in_flight = pause_started.map(|s| s.elapsed()).unwrap_or(Duration::ZERO);
        started.elapsed().saturating_sub(paused_total + in_flight)
    }

    fn snapshot(
        control: &SearchControl,
        window: &SpeedWindow,
        workers: usize,
        total_attempts: u64,
        elapsed: Duration,
        expected_attempts: f64,
    ) -> ProgressUpdate {
        let recent_speed = window.recent() * workers as f64;
        let secs = elapsed.as_secs_f64();
        let average_speed = if secs > 0.0 {
            total_attempts as f64 / secs
        } else {
            0.0
        };
        let remaining = (expected_attempts - total_attempts as f64).max(0.0);
        let eta_seconds = if recent_speed > 0.0 {
            remaining / recent_speed
        } else {
            f64::INFINITY
        };

        ProgressUpdate {
            status: if control.is_paused() {
                SearchStatus::Paused
            } else {
                SearchStatus::Running
            },
            recent_speed,
            average_speed,
            total_attempts,
            elapsed,
            eta_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorError, SolanaGenerator};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Matches on the Nth call, never before.
    struct ScriptedGenerator {
        calls: AtomicU64,
        match_on: u64,
    }

    impl ScriptedGenerator {
        fn new(match_on: u64) -> Self {
            Self {
                calls: AtomicU64::new(0),
                match_on,
            }
        }
    }

    impl CandidateGenerator for ScriptedGenerator {
        fn generate(&self) -> Result<Candidate, GeneratorError> {
            let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
            let address = if n >= self.match_on { "Abc123" } else { "zzz999" };
            Ok(Candidate {
                address: address.to_string(),
                keypair: solvanity_crypto::Keypair::generate(),
            })
        }
    }

    struct BrokenGenerator;

    impl CandidateGenerator for BrokenGenerator {
        fn generate(&self) -> Result<Candidate, GeneratorError> {
            Err(GeneratorError("entropy source failed".into()))
        }
    }

    #[test]
    fn test_finds_scripted_match() {
        let engine = SearchEngine::new(
            Arc::new(ScriptedGenerator::new(500)),
            PatternSpec::prefix("Abc"),
            2,
        );
        let control = SearchControl::new();

        match engine.run(&control).unwrap() {
            SearchOutcome::Found {
                candidate,
                total_attempts,
                ..
            } => {
                assert!(candidate.address.starts_with("Abc"));
                assert!(total_attempts >= 500);
            }
            other => panic!("expected Found, got {other:?}"),
        }
        assert!(control.is_stopped());
    }

    #[test]
    fn test_search_easy_pattern_real_generator() {
        // Prefix probability is 1/58 per attempt; finishes in well under a second.
        let engine = SearchEngine::new(Arc::new(SolanaGenerator), PatternSpec::prefix("A"), 1);
        let control = SearchControl::new();

        match engine.run(&control).unwrap() {
            SearchOutcome::Found {
                candidate,
                total_attempts,
                elapsed,
            } => {
                assert!(candidate.address.starts_with('A'));
                assert_eq!(candidate.keypair.address(), candidate.address);
                assert!(total_attempts >= 1);
                assert!(elapsed >= Duration::ZERO);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_observed_first_wins() {
        // Cancel before the run begins: the aggregator must report Cancelled
        // and discard any match a worker produces.
        let engine = SearchEngine::new(
            Arc::new(ScriptedGenerator::new(1)),
            PatternSpec::prefix("Abc"),
            2,
        );
        let control = SearchControl::new();
        control.request_cancel();

        match engine.run(&control).unwrap() {
            SearchOutcome::Cancelled { .. } => {}
            other => panic!("expected Cancelled, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_is_refused() {
        let engine = SearchEngine::new(
            Arc::new(SolanaGenerator),
            // 'l' is outside the Base58 alphabet
            PatternSpec::prefix("l"),
            1,
        );
        let control = SearchControl::new();
        assert!(matches!(
            engine.run(&control),
            Err(SearchError::InvalidPattern)
        ));
    }

    #[test]
    fn test_zero_workers_is_refused() {
        let engine = SearchEngine::new(Arc::new(SolanaGenerator), PatternSpec::prefix("A"), 0);
        let control = SearchControl::new();
        assert!(matches!(engine.run(&control), Err(SearchError::NoWorkers)));
    }

    #[test]
    fn test_all_workers_faulting_is_an_error() {
        let engine = SearchEngine::new(Arc::new(BrokenGenerator), PatternSpec::prefix("A"), 4);
        let control = SearchControl::new();
        assert!(matches!(
            engine.run(&control),
            Err(SearchError::WorkersFailed)
        ));
    }
}
