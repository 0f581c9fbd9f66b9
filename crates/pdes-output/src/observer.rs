//! `RoundOutputObserver<W>` — bridges `RunObserver` to an `OutputWriter`.

use tracing::warn;

use pdes_sched::{RoundSummary, RunObserver, RunStats};

use crate::row::RoundSummaryRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`RunObserver`] that writes one summary row per round to any
/// [`OutputWriter`].
///
/// `RunObserver` hooks cannot fail, so the first write error is stored and
/// later writes are skipped.  Check [`take_error`][Self::take_error] after
/// the run.
pub struct RoundOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RoundOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwrap the inner writer (e.g. to write model rows after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed; further rows are dropped");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> RunObserver for RoundOutputObserver<W> {
    fn on_round_end(&mut self, summary: &RoundSummary) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_round_summary(&RoundSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_run_end(&mut self, _stats: &RunStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
