//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ArrivalRow, OutputResult, RoundSummaryRow};

/// Sink for run output.
///
/// The observer never fails a run over output: errors are stored and
/// retrieved with [`RoundOutputObserver::take_error`][crate::RoundOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one round summary row.
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()>;

    /// Write a batch of arrivals.
    fn write_arrivals(&mut self, rows: &[ArrivalRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent.  Rows written afterwards need another `finish`.
    fn finish(&mut self) -> OutputResult<()>;
}
