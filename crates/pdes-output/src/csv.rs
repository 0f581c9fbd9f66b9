//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `round_summaries.csv`
//! - `arrivals.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ArrivalRow, OutputResult, RoundSummaryRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    arrivals:  Writer<File>,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) both files, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join("round_summaries.csv"))?;
        summaries.write_record(["round", "horizon", "delivered", "pending"])?;

        let mut arrivals = Writer::from_path(dir.join("arrivals.csv"))?;
        arrivals.write_record(["vehicle", "link", "time"])?;

        Ok(Self { summaries, arrivals })
    }
}

impl OutputWriter for CsvWriter {
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.round.to_string(),
            row.horizon.to_string(),
            row.delivered.to_string(),
            row.pending.to_string(),
        ])?;
        Ok(())
    }

    fn write_arrivals(&mut self, rows: &[ArrivalRow]) -> OutputResult<()> {
        for row in rows {
            self.arrivals.write_record(&[
                row.vehicle.to_string(),
                row.link.to_string(),
                row.time.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.summaries.flush()?;
        self.arrivals.flush()?;
        Ok(())
    }
}
