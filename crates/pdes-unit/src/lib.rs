//! `pdes-unit` — the simulation unit trait and its scheduling context.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`unit`]    | `SimUnit` trait                                              |
//! | [`context`] | `Context<'a, P>` — `schedule` / `unschedule` for one unit    |
//! | [`error`]   | `UnitError`, `UnitResult<T>`                                 |
//!
//! # Design notes
//!
//! A unit never sees the scheduler.  Its owning worker hands it a
//! [`Context`] for the duration of one `initialize` or `process` call.  The
//! context holds the routing table, the current horizon, and the unit's own
//! sequence counter.  That is everything needed to produce correctly ordered,
//! correctly routed messages, and it rejects any message that would break
//! causality at the point it is scheduled.

pub mod context;
pub mod error;
pub mod unit;


pub use context::Context;
pub use error::{UnitError, UnitResult};
pub use unit::SimUnit;
