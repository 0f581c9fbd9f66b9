//! Plain data row types written by output backends.

use pdes_sched::RoundSummary;

/// One synchronization round as seen at the barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummaryRow {
    pub round:     u64,
    /// Horizon in seconds.
    pub horizon:   f64,
    pub delivered: u64,
    /// Queued plus staged messages after the round.
    pub pending:   u64,
}

impl From<&RoundSummary> for RoundSummaryRow {
    fn from(s: &RoundSummary) -> Self {
        Self {
            round:     s.round,
            horizon:   s.horizon.0,
            delivered: s.delivered,
            pending:   s.pending(),
        }
    }
}

/// A finished trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalRow {
    pub vehicle: u32,
    pub link:    u32,
    pub time:    f64,
}
