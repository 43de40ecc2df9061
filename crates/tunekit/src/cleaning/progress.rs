//! Cosmetic batch progress.
//!
//! Progress advances on a timer rather than per item, stalls at a cap until
//! the run finishes and then jumps to 100.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Highest value the ticker may reach; only `complete` sets 100.
pub const TICK_CEILING: u8 = 99;

/// Shared handle on the current progress percentage.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    percent: Arc<AtomicU8>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage, 0-100.
    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Acquire)
    }

    pub fn is_complete(&self) -> bool {
        self.percent() >= 100
    }

    pub(crate) fn reset(&self) {
        self.percent.store(0, Ordering::Release);
    }

    /// Add `step`, never going past `cap` (itself held below 100) and never
    /// going backwards.
    pub(crate) fn advance(&self, step: u8, cap: u8) {
        let cap = cap.min(TICK_CEILING);
        let _ = self
            .percent
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let next = current.saturating_add(step).min(cap).max(current);
                (next != current).then_some(next)
            });
    }

    pub(crate) fn complete(&self) {
        self.percent.store(100, Ordering::Release);
    }
}

/// Advance `progress` every `tick` until `stop` is dropped or signalled.
pub(crate) fn run_ticker(progress: &Progress, stop: &Receiver<()>, tick: Duration, step: u8, cap: u8) {
    loop {
        match stop.recv_timeout(tick) {
            Err(RecvTimeoutError::Timeout) => progress.advance(step, cap),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
