//! `pdes-traffic` — a queue-based traffic model on top of `pdes-sched`.
//!
//! Every directed link of a [`Network`][pdes_network::Network] becomes one
//! [`Road`] unit, registered so that `UnitId(i) == LinkId(i)`.  Vehicles
//! hop from road to road as [`TrafficEvent::Enter`] messages.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`vehicle`]    | `Vehicle`, `Population`, `generate_population`          |
//! | [`road`]       | `Road` (the `SimUnit`), `TrafficEvent`, `Arrival`       |
//! | [`scenario`]   | `register_roads`, `collect_arrivals`                    |
//! | [`error`]      | `TrafficError`, `TrafficResult<T>`                      |
//!
//! # Road model
//!
//! ```text
//! enter at t ──▶ exit = max(t + free_travel, next_free_exit)
//!                next_free_exit = exit + headway        (1 / capacity)
//!                exit ──▶ Enter on the next link of the route, or Arrival
//! ```
//!
//! A road's lookahead is its free travel time: nothing it sends can be
//! earlier than that after the message it is handling.

pub mod error;
pub mod road;
pub mod scenario;
pub mod vehicle;


pub use error::{TrafficError, TrafficResult};
pub use road::{Arrival, Road, TrafficEvent};
pub use scenario::{collect_arrivals, register_roads};
pub use vehicle::{generate_population, DepartureWindow, Population, Vehicle};
