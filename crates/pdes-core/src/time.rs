//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous `f64` count of simulated seconds wrapped in
//! [`SimTime`].  Events happen at arbitrary instants rather than on a fixed
//! tick grid, so an integer counter would force every model to pick a
//! resolution up front.
//!
//! `SimTime` is totally ordered (`f64::total_cmp`) so it can key a
//! `BTreeMap`.  Non-finite values are rejected where user code hands a time
//! to the framework: configuration ([`SimTime::try_from_secs`]) and message
//! scheduling.
//!
//! [`Horizon`] is the process-wide synchronization state: the time up to
//! which delivery is currently safe, and the fixed step it advances by.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use crate::{CoreError, CoreResult};

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute simulation instant, in seconds since the scenario's epoch.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub const fn from_secs(secs: f64) -> Self {
        SimTime(secs)
    }

    /// Like [`from_secs`](Self::from_secs) but rejects NaN and infinities.
    pub fn try_from_secs(secs: f64) -> CoreResult<Self> {
        if secs.is_finite() {
            Ok(SimTime(secs))
        } else {
            Err(CoreError::InvalidTime(secs))
        }
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn min(self, other: SimTime) -> SimTime {
        if other < self { other } else { self }
    }

    #[inline]
    pub fn max(self, other: SimTime) -> SimTime {
        if other > self { other } else { self }
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

// Consistent with `Ord`: `total_cmp` equality is bit equality.
impl std::hash::Hash for SimTime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime(secs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}

// ── Horizon ──────────────────────────────────────────────────────────────────

/// Conservative synchronization state, owned by the coordinator.
///
/// Workers may deliver every message with `time <= current`.  Units may only
/// produce messages with `time >= current`; anything earlier is a causality
/// violation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizon {
    /// Upper bound (inclusive) of the current round's delivery window.
    pub current: SimTime,
    /// Step between rounds: the minimum lookahead over all units.
    pub delta: SimTime,
}

impl Horizon {
    /// The horizon of round 1 for a run starting at `start`.
    pub fn first(start: SimTime, delta: SimTime) -> Self {
        Self { current: start + delta, delta }
    }

    /// Advance by exactly one `delta`.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + self.delta;
    }

    /// Advance to the window that starts at the earliest pending message.
    ///
    /// Never moves less than one `delta`.  Every message in the new window
    /// has `time >= earliest`, so anything it produces lands at or after
    /// `earliest + delta`, which is the new horizon.
    pub fn advance_to_pending(&mut self, earliest: SimTime) {
        let stepped = self.current + self.delta;
        self.current = stepped.max(earliest + self.delta);
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "horizon {} (delta {:.3})", self.current, self.delta.0)
    }
}
