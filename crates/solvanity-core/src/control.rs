//! Shared control flags for one search session

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pause/stop flags shared between the caller, the coordinator and every
/// worker. One instance per search session, owned by the caller and passed in
/// by reference, so concurrent searches never interfere.
///
/// `paused` is toggled only by the controlling caller, `stopped` is set by
/// the coordinator on success or cancel, `cancelled` only via
/// [`request_cancel`](Self::request_cancel). Requests arriving after the
/// search has concluded are no-ops.
#[derive(Debug, Default)]
pub struct SearchControl {
    paused: AtomicBool,
    stopped: AtomicBool,
    cancelled: AtomicBool,
}

impl SearchControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Suspend all workers. They stop generating within one polling interval.
    pub fn request_pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Resume a paused search.
    pub fn request_resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Cancel the search. Takes precedence over a concurrently found match
    /// if the coordinator observes it first.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Stop all workers. Set by the coordinator once an outcome is decided.
    pub(crate) fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}
