//! Synthetic progress estimator for outstanding transcription requests.
//!
//! The estimator is a wall-clock ramp, not a reflection of real backend
//! progress: it jumps to a floor when the request is dispatched, creeps
//! toward a ceiling on a fixed tick, and parks there until the request
//! settles.  Success forces 100; failure, rate-limiting and preemption
//! abandon the ramp wherever it stands.
//!
//! [`ProgressHandle`] owns the recurring ticker task and is consumed by
//! exactly one of [`finish`](ProgressHandle::finish) or
//! [`abandon`](ProgressHandle::abandon), so a leaked timer or a double
//! cancel is not expressible.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::ProgressConfig;

// ---------------------------------------------------------------------------
// ProgressCell
// ---------------------------------------------------------------------------

/// Shared percentage cell read by the UI.
///
/// Cheap to clone; the ticker task writes it, everyone else reads it.
#[derive(Debug, Clone, Default)]
pub struct ProgressCell(Arc<AtomicU8>);

impl ProgressCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage, 0–100.
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset to 0 (a new file selection discards old progress).
    pub fn reset(&self) {
        self.set(0);
    }

    fn set(&self, pct: u8) {
        self.0.store(pct, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// ProgressHandle
// ---------------------------------------------------------------------------

/// Owns the ticker task driving one request's progress ramp.
#[derive(Debug)]
pub struct ProgressHandle {
    task: JoinHandle<()>,
    cell: ProgressCell,
}

impl ProgressHandle {
    /// Set the floor immediately and start the recurring ramp ticker.
    pub fn start(cell: ProgressCell, config: &ProgressConfig) -> Self {
        cell.set(config.floor_pct);

        let ticker_cell = cell.clone();
        let config = config.clone();
        let task = tokio::spawn(async move {
            // interval panics on a zero period
            let period = Duration::from_millis(config.tick_ms.max(1));
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // the first tick completes immediately
            loop {
                ticker.tick().await;
                ticker_cell.set(bumped(ticker_cell.get(), &config));
            }
        });

        Self { task, cell }
    }

    /// Stop the ticker and force the ramp to 100 (successful settlement).
    pub fn finish(self) {
        self.task.abort();
        self.cell.set(100);
    }

    /// Stop the ticker and leave the ramp wherever it stands (failure,
    /// rate-limit, or preemption by a new file selection).
    pub fn abandon(self) {
        self.task.abort();
    }
}

/// One ramp step: advance by `step_pct`, saturating at the ceiling.
fn bumped(current: u8, config: &ProgressConfig) -> u8 {
    current
        .saturating_add(config.step_pct)
        .min(config.ceiling_pct)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
