//! `pdes-network` — link network, loading, routing, and partitioning.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`network`]   | `Network` (CSR), `NetworkBuilder`, `Point`                |
//! | [`loader`]    | `load_network_csv`, `load_network_reader`                 |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`partition`] | `partition_by_x`, `partition_round_robin`                 |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Units
//!
//! Coordinates and lengths are metres, speeds metres per second, capacities
//! vehicles per hour.  Every derived time (free-flow travel, headway) is in
//! seconds as `f64`, the same unit as `SimTime`.

pub mod error;
pub mod loader;
pub mod network;
pub mod partition;
pub mod router;


pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{Network, NetworkBuilder, Point};
pub use partition::{partition_by_x, partition_round_robin};
pub use router::{DijkstraRouter, Route, Router};
