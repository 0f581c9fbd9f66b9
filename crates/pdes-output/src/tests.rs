//! Unit tests for pdes-output.

use std::path::Path;

use pdes_core::{SimConfig, SimTime, UnitId, WorkerId};
use pdes_queue::Message;
use pdes_sched::{RoundSummary, RunObserver, RunStats, Scheduler};
use pdes_unit::{Context, SimUnit, UnitResult};

use crate::{ArrivalRow, CsvWriter, OutputError, OutputResult, OutputWriter, RoundOutputObserver, RoundSummaryRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Reschedules itself one second later until the payload reaches zero.
#[derive(Debug)]
struct Countdown;

impl SimUnit for Countdown {
    type Payload = u32;

    fn lookahead(&self) -> SimTime {
        SimTime(1.0)
    }

    fn process(&mut self, message: &Message<u32>, ctx: &mut Context<'_, u32>) -> UnitResult<()> {
        let left = *message.payload();
        if left > 0 {
            ctx.schedule_self(message.time() + 1.0, left - 1)?;
        }
        Ok(())
    }
}

fn summary(round: u64, delivered: u64, queued: u64, staged: u64) -> RoundSummary {
    RoundSummary {
        round,
        horizon: SimTime(round as f64),
        delivered,
        per_worker: vec![delivered],
        queued,
        staged,
    }
}

fn read(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path).unwrap().lines().map(str::to_owned).collect()
}

/// Records every call and fails round writes from `fail_from` on.
#[derive(Default)]
struct Recording {
    rounds:    Vec<RoundSummaryRow>,
    finished:  usize,
    fail_from: Option<u64>,
}

impl OutputWriter for Recording {
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        if self.fail_from.is_some_and(|r| row.round >= r) {
            return Err(OutputError::Io(std::io::Error::other("disk full")));
        }
        self.rounds.push(*row);
        Ok(())
    }

    fn write_arrivals(&mut self, _rows: &[ArrivalRow]) -> OutputResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished += 1;
        Ok(())
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use super::*;

    #[test]
    fn summary_row_sums_pending() {
        let row = RoundSummaryRow::from(&summary(3, 5, 2, 4));
        assert_eq!(row, RoundSummaryRow { round: 3, horizon: 3.0, delivered: 5, pending: 6 });
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_writer {
    use super::*;

    #[test]
    fn creates_files_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let mut w = CsvWriter::new(&out).unwrap();
        w.finish().unwrap();

        assert_eq!(read(&out.join("round_summaries.csv")), vec!["round,horizon,delivered,pending"]);
        assert_eq!(read(&out.join("arrivals.csv")), vec!["vehicle,link,time"]);
    }

    #[test]
    fn writes_rows_and_finish_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();

        w.write_round_summary(&RoundSummaryRow { round: 1, horizon: 10.5, delivered: 3, pending: 2 })
            .unwrap();
        w.finish().unwrap();
        w.write_arrivals(&[
            ArrivalRow { vehicle: 0, link: 4, time: 35.0 },
            ArrivalRow { vehicle: 1, link: 2, time: 40.25 },
        ])
        .unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        assert_eq!(read(&dir.path().join("round_summaries.csv"))[1], "1,10.5,3,2");
        assert_eq!(
            &read(&dir.path().join("arrivals.csv"))[1..],
            &["0,4,35".to_owned(), "1,2,40.25".to_owned()]
        );
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[test]
    fn one_row_per_round_then_finish() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let a = sched.register(Countdown, WorkerId(0)).unwrap();
        let b = sched.register(Countdown, WorkerId(1)).unwrap();
        sched.schedule(a, SimTime(0.0), 4).unwrap();
        sched.schedule(b, SimTime(0.5), 2).unwrap();

        let mut obs = RoundOutputObserver::new(Recording::default());
        let stats = sched.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.finished, 1);
        assert_eq!(w.rounds.len() as u64, stats.rounds);
        assert_eq!(w.rounds.iter().map(|r| r.delivered).sum::<u64>(), 8);
        assert_eq!(w.rounds.last().map(|r| r.pending), Some(0));
        assert!(w.rounds.windows(2).all(|p| p[0].round + 1 == p[1].round));
    }

    #[test]
    fn csv_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut sched = Scheduler::new(SimConfig::default()).unwrap();
        let id = sched.register(Countdown, WorkerId(0)).unwrap();
        assert_eq!(id, UnitId(0));
        sched.schedule(id, SimTime(0.0), 2).unwrap();

        let mut obs = RoundOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let stats = sched.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let lines = read(&dir.path().join("round_summaries.csv"));
        assert_eq!(lines.len() as u64, stats.rounds + 1);
    }

    #[test]
    fn first_error_is_kept_and_later_rows_dropped() {
        let writer = Recording { fail_from: Some(2), ..Recording::default() };
        let mut obs = RoundOutputObserver::new(writer);
        for round in 1..=4 {
            obs.on_round_end(&summary(round, 1, 1, 0));
        }
        obs.on_run_end(&RunStats::default());

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
        assert_eq!(obs.writer_mut().rounds.len(), 1);
        assert_eq!(obs.writer_mut().finished, 1);
    }
}
