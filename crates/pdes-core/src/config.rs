//! Run configuration.

use crate::{CoreError, CoreResult, SimTime};

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `pdes_sched::Scheduler::new`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of message-executor threads.  Must be at least 1.
    pub num_workers: usize,

    /// Time of the scenario's first instant.  Nothing may be scheduled
    /// earlier.  Default: 0.
    pub start_time: SimTime,

    /// Optional hard stop.  Messages later than this are never delivered and
    /// are reported as undelivered.
    pub end_time: Option<SimTime>,

    /// Let the horizon jump straight to the earliest pending message instead
    /// of stepping through empty rounds one `delta` at a time.
    pub skip_idle_rounds: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_workers:      1,
            start_time:       SimTime::ZERO,
            end_time:         None,
            skip_idle_rounds: false,
        }
    }
}

impl SimConfig {
    /// Convenience constructor with everything else defaulted.
    pub fn with_workers(num_workers: usize) -> Self {
        Self { num_workers, ..Self::default() }
    }

    /// Check the configuration before a run.  Every error here is a setup
    /// error: the run must not start.
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_workers == 0 {
            return Err(CoreError::Config("worker pool is empty (num_workers = 0)".into()));
        }
        if self.num_workers > u16::MAX as usize {
            return Err(CoreError::Config(format!(
                "num_workers {} exceeds the maximum of {}",
                self.num_workers,
                u16::MAX
            )));
        }
        SimTime::try_from_secs(self.start_time.0)?;
        if let Some(end) = self.end_time {
            SimTime::try_from_secs(end.0)?;
            if end < self.start_time {
                return Err(CoreError::Config(format!(
                    "end_time {end} is before start_time {}",
                    self.start_time
                )));
            }
        }
        Ok(())
    }

    /// Upper delivery bound for a round with horizon `horizon`, clamped to
    /// `end_time` if one is set.
    #[inline]
    pub fn delivery_limit(&self, horizon: SimTime) -> SimTime {
        match self.end_time {
            Some(end) => horizon.min(end),
            None      => horizon,
        }
    }

    /// `true` once nothing produced after a round with `horizon` could still
    /// fall at or before `end_time`.
    #[inline]
    pub fn reached_end(&self, horizon: SimTime) -> bool {
        self.end_time.is_some_and(|end| horizon > end)
    }
}
