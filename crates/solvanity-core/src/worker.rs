//! Search worker threads

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use solvanity_pattern::PatternSpec;

use crate::control::SearchControl;
use crate::generator::{Candidate, CandidateGenerator};

/// How long a paused worker sleeps before re-checking the flags. Also bounds
/// shutdown latency: a worker observes `stopped` within one interval.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How often a busy worker reports a speed sample.
const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Events flowing from workers to the coordinator.
///
/// The channel carrying these is unbounded by policy: producers never block
/// on a slow aggregator. Traffic is bounded in practice at roughly one speed
/// sample per worker per second plus one terminal event per worker.
#[derive(Debug)]
pub(crate) enum Telemetry {
    /// Attempts made over a measured window (1s, or a partial window flushed
    /// at pause or shutdown)
    Speed {
        worker_id: usize,
        attempts: u64,
        window_secs: f64,
    },
    /// A matching candidate, with the attempts since this worker's last
    /// report (the match itself included)
    Found {
        worker_id: usize,
        candidate: Candidate,
        attempts: u64,
    },
    /// The generator failed; fatal for this worker only
    Fault { worker_id: usize, error: String },
}

/// Spawn one worker. It generates and tests candidates until it finds a
/// match, the shared `stopped` flag is set, or its generator fails.
pub(crate) fn spawn_worker(
    worker_id: usize,
    generator: Arc<dyn CandidateGenerator>,
    spec: PatternSpec,
    control: Arc<SearchControl>,
    tx: Sender<Telemetry>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name(format!("vanity-worker-{worker_id}"))
        .spawn(move || run_worker(worker_id, generator, spec, control, tx))
        .expect("failed to spawn worker thread")
}

fn run_worker(
    worker_id: usize,
    generator: Arc<dyn CandidateGenerator>,
    spec: PatternSpec,
    control: Arc<SearchControl>,
    tx: Sender<Telemetry>,
) {
    let mut attempts: u64 = 0;
    let mut window_start = Instant::now();

    while !control.is_stopped() {
        if control.is_paused() {
            // Flush the pending window so totals stay accurate during the
            // pause, then restart the window on resume.
            flush(worker_id, &tx, &mut attempts, window_start);
            thread::sleep(POLL_INTERVAL);
            window_start = Instant::now();
            continue;
        }

        let candidate = match generator.generate() {
            Ok(candidate) => candidate,
            Err(e) => {
                flush(worker_id, &tx, &mut attempts, window_start);
                let _ = tx.send(Telemetry::Fault {
                    worker_id,
                    error: e.to_string(),
                });
                return;
            }
        };

        if spec.matches(&candidate.address) {
            let _ = tx.send(Telemetry::Found {
                worker_id,
                candidate,
                attempts: attempts + 1,
            });
            return;
        }
        attempts += 1;

        let window = window_start.elapsed();
        if window >= SAMPLE_WINDOW {
            let _ = tx.send(Telemetry::Speed {
                worker_id,
                attempts,
                window_secs: window.as_secs_f64(),
            });
            attempts = 0;
            window_start = Instant::now();
        }
    }

    // Stopped externally: flush the partial window and exit.
    flush(worker_id, &tx, &mut attempts, window_start);
}

fn flush(worker_id: usize, tx: &Sender<Telemetry>, attempts: &mut u64, window_start: Instant) {
    if *attempts > 0 {
        let _ = tx.send(Telemetry::Speed {
            worker_id,
            attempts: *attempts,
            window_secs: window_start.elapsed().as_secs_f64(),
        });
        *attempts = 0;
    }
}
