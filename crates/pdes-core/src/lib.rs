//! `pdes-core` — foundational types for the `pdes` parallel discrete-event
//! framework.
//!
//! This crate is a dependency of every other `pdes-*` crate.  It has no
//! `pdes-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `UnitId`, `WorkerId`, `MessageId`, `NodeId`, `LinkId`, ... |
//! | [`time`]     | `SimTime`, `Horizon`                                       |
//! | [`config`]   | `SimConfig`                                                |
//! | [`error`]    | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{LinkId, MessageId, NodeId, UnitId, VehicleId, WorkerId};
pub use time::{Horizon, SimTime};
