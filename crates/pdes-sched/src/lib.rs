//! `pdes-sched` — the parallel discrete-event scheduling engine.
//!
//! # Round protocol
//!
//! ```text
//! setup:   register units, schedule seeds        ──▶ inboxes, round 0
//!          initialize every unit (may schedule)  ──▶ inboxes, round 0
//!
//! round r (horizon H_r):
//!   each worker, in parallel:
//!     ① merge   — take inbox[(r-1) % 2] into its own queue
//!                 (deliveries first, then cancellations)
//!     ② drain   — pop every message with time ≤ H_r, call the target
//!                 unit's `process`; new messages go to inbox[r % 2]
//!     ③ report  — send RoundReport to the coordinator, block for a command
//!   coordinator, once all N reports are in:
//!     ④ decide  — fault?          → Terminate everyone, return the error
//!                 nothing queued and nothing staged → Terminate, Ok
//!                 otherwise       → H_{r+1} = H_r + delta, Advance
//! ```
//!
//! `delta` is the minimum [`SimUnit::lookahead`][pdes_unit::SimUnit::lookahead]
//! over every registered unit.  A unit handling a message in round `r` may
//! only produce messages at or after `H_r`.  Those become visible at the start
//! of round `r + 1`, so no worker can miss a message that belonged in a
//! window it already drained.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs unit initialization on Rayon's thread pool.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pdes_core::{SimConfig, SimTime, WorkerId};
//! use pdes_sched::{NoopObserver, Scheduler};
//!
//! let mut sched = Scheduler::new(SimConfig::with_workers(2))?;
//! let a = sched.register(relay_a, WorkerId(0))?;
//! let b = sched.register(relay_b, WorkerId(1))?;
//! sched.schedule(a, SimTime(5.0), Payload::Start)?;
//! let stats = sched.run(&mut NoopObserver)?;
//! ```

pub mod error;
pub mod observer;
pub mod scheduler;
pub mod stats;
mod worker;

#[cfg(test)]
mod tests;

pub use error::{SchedError, SchedResult};
pub use observer::{NoopObserver, RoundSummary, RunObserver};
pub use scheduler::{RunState, Scheduler};
pub use stats::{RunStats, WorkerStats};
