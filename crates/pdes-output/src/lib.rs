//! `pdes-output` — run output writers for the pdes framework.
//!
//! | Writer        | Files created                                  |
//! |---------------|------------------------------------------------|
//! | [`CsvWriter`] | `round_summaries.csv`, `arrivals.csv`          |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`RoundOutputObserver`], which implements `pdes_sched::RunObserver`.
//! Model-level rows such as arrivals are written by the harness after the
//! run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pdes_output::{CsvWriter, RoundOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = RoundOutputObserver::new(writer);
//! sched.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RoundOutputObserver;
pub use row::{ArrivalRow, RoundSummaryRow};
pub use writer::OutputWriter;
