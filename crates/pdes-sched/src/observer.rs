//! Run observer trait for progress reporting and data collection.

use pdes_core::SimTime;

use crate::RunStats;

/// What the coordinator saw at the barrier after one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub round:     u64,
    pub horizon:   SimTime,
    /// Messages delivered this round, all workers.
    pub delivered: u64,
    /// Delivered per worker, indexed by `WorkerId`.
    pub per_worker: Vec<u64>,
    /// Messages left in worker queues after the drain.
    pub queued:    u64,
    /// Messages produced this round, waiting for the next one.
    pub staged:    u64,
}

impl RoundSummary {
    /// Pending work at the barrier.
    #[inline]
    pub fn pending(&self) -> u64 {
        self.queued + self.staged
    }
}

/// Callbacks invoked by [`Scheduler::run`][crate::Scheduler::run] on the
/// coordinator thread.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Nothing here runs concurrently with
/// anything else in the observer, so implementations need not be `Sync`.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl RunObserver for Progress {
///     fn on_round_end(&mut self, s: &RoundSummary) {
///         if s.round % 100 == 0 {
///             println!("round {} @ {}: {} pending", s.round, s.horizon, s.pending());
///         }
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once, after setup, before round 1.
    fn on_run_start(&mut self, _horizon_delta: SimTime, _num_workers: usize) {}

    /// Called just before workers are released into `round`.
    fn on_round_start(&mut self, _round: u64, _horizon: SimTime) {}

    /// Called once every worker has reported for the round.
    fn on_round_end(&mut self, _summary: &RoundSummary) {}

    /// Called once after all workers have exited, on success only.
    fn on_run_end(&mut self, _stats: &RunStats) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
