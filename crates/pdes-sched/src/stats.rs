//! Run statistics handed back to the harness.

use pdes_core::{SimTime, WorkerId};

/// Per-worker counters, accumulated by the worker thread itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkerStats {
    pub worker:      WorkerId,
    /// Messages handed to `process`.
    pub delivered:   u64,
    /// Messages scheduled by units while this worker ran them.
    pub produced:    u64,
    /// Cancellations that removed a message from this worker's queue.
    pub cancelled:   u64,
    /// Rounds in which at least one message was delivered.
    pub busy_rounds: u64,
    /// Rounds with nothing to deliver.
    pub idle_rounds: u64,
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Synchronization rounds executed.
    pub rounds:        u64,
    /// Horizon step (minimum unit lookahead).
    pub horizon_delta: SimTime,
    /// Horizon of the last round.
    pub final_horizon: SimTime,
    /// Messages queued before round 1 (harness seeds plus `initialize`).
    pub seeded:        u64,
    pub delivered:     u64,
    pub produced:      u64,
    pub cancelled:     u64,
    /// Messages still pending when an `end_time` stopped the run.
    pub undelivered:   u64,
    pub workers:       Vec<WorkerStats>,
}

impl RunStats {
    /// Fold per-worker counters into the totals.
    pub(crate) fn absorb(&mut self, workers: Vec<WorkerStats>) {
        self.delivered = workers.iter().map(|w| w.delivered).sum();
        self.produced  = workers.iter().map(|w| w.produced).sum();
        self.cancelled = workers.iter().map(|w| w.cancelled).sum();
        self.workers   = workers;
    }
}
