//! Integration tests for pdes-sched.

use std::fmt;

use pdes_core::{SimConfig, SimTime, UnitId, WorkerId};
use pdes_queue::{Message, MessageRef};
use pdes_unit::{Context, SimUnit, UnitError, UnitResult};

use crate::{NoopObserver, RoundSummary, RunObserver, RunState, RunStats, SchedError, Scheduler};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Ev {
    Label(&'static str),
    Hop(u32),
}

type React = Box<dyn FnMut(&Message<Ev>, &mut Context<'_, Ev>) -> UnitResult<()> + Send>;
type Init = Box<dyn FnMut(&mut Context<'_, Ev>) -> UnitResult<()> + Send>;

/// A unit that logs every delivery and then runs an optional reaction.
struct Script {
    lookahead: f64,
    seen:      Vec<(f64, Ev)>,
    react:     Option<React>,
    init:      Option<Init>,
}

impl Script {
    fn new(lookahead: f64) -> Self {
        Self { lookahead, seen: Vec::new(), react: None, init: None }
    }

    fn on(
        mut self,
        f: impl FnMut(&Message<Ev>, &mut Context<'_, Ev>) -> UnitResult<()> + Send + 'static,
    ) -> Self {
        self.react = Some(Box::new(f));
        self
    }

    fn on_init(mut self, f: impl FnMut(&mut Context<'_, Ev>) -> UnitResult<()> + Send + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("lookahead", &self.lookahead)
            .field("seen", &self.seen.len())
            .finish()
    }
}

impl SimUnit for Script {
    type Payload = Ev;

    fn lookahead(&self) -> SimTime {
        SimTime(self.lookahead)
    }

    fn initialize(&mut self, ctx: &mut Context<'_, Ev>) -> UnitResult<()> {
        match &mut self.init {
            Some(f) => f(ctx),
            None    => Ok(()),
        }
    }

    fn process(&mut self, message: &Message<Ev>, ctx: &mut Context<'_, Ev>) -> UnitResult<()> {
        self.seen.push((message.time().0, message.payload().clone()));
        match &mut self.react {
            Some(f) => f(message, ctx),
            None    => Ok(()),
        }
    }
}

#[derive(Default)]
struct Recorder {
    run_start: Option<(SimTime, usize)>,
    starts:    Vec<(u64, SimTime)>,
    rounds:    Vec<RoundSummary>,
    finished:  Option<RunStats>,
}

impl RunObserver for Recorder {
    fn on_run_start(&mut self, delta: SimTime, workers: usize) {
        self.run_start = Some((delta, workers));
    }
    fn on_round_start(&mut self, round: u64, horizon: SimTime) {
        self.starts.push((round, horizon));
    }
    fn on_round_end(&mut self, summary: &RoundSummary) {
        self.rounds.push(summary.clone());
    }
    fn on_run_end(&mut self, stats: &RunStats) {
        self.finished = Some(stats.clone());
    }
}

fn seen(sched: &Scheduler<Script>, id: UnitId) -> Vec<(f64, Ev)> {
    sched.unit(id).expect("unit present").seen.clone()
}

/// Six units on a ring; each hop forwards to the next unit and every third
/// hop also fans out further ahead.
fn ring_run(workers: usize) -> Vec<Vec<(f64, Ev)>> {
    const N: u32 = 6;
    let mut sched = Scheduler::new(SimConfig::with_workers(workers)).unwrap();
    for i in 0..N {
        let me = i;
        let unit = Script::new(1.0 + i as f64 * 0.5).on(move |m, ctx| {
            let Ev::Hop(n) = *m.payload() else { return Ok(()) };
            if n >= 20 {
                return Ok(());
            }
            ctx.schedule(UnitId((me + 1) % N), ctx.now() + 1.0 + me as f64 * 0.5, Ev::Hop(n + 1))?;
            if n % 3 == 0 {
                ctx.schedule(UnitId((me * 7 + n) % N), ctx.now() + 4.0, Ev::Hop(n + 2))?;
            }
            Ok(())
        });
        sched.register(unit, WorkerId((i as usize % workers) as u16)).unwrap();
    }
    sched.schedule(UnitId(0), SimTime(0.0), Ev::Hop(0)).unwrap();
    sched.schedule(UnitId(3), SimTime(0.0), Ev::Hop(5)).unwrap();
    sched.run(&mut NoopObserver).unwrap();
    (0..N).map(|i| seen(&sched, UnitId(i))).collect()
}

// ── Round protocol ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rounds {
    use super::*;

    /// A on worker 0, B on worker 1, lookahead 10, seeds (A, 5) and (B, 12).
    fn two_units(react: impl FnMut(&Message<Ev>, &mut Context<'_, Ev>) -> UnitResult<()> + Send + 'static)
        -> (Scheduler<Script>, UnitId, UnitId)
    {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let a = sched.register(Script::new(10.0).on(react), WorkerId(0)).unwrap();
        let b = sched.register(Script::new(10.0), WorkerId(1)).unwrap();
        sched.schedule(a, SimTime(5.0), Ev::Label("a")).unwrap();
        sched.schedule(b, SimTime(12.0), Ev::Label("b")).unwrap();
        (sched, a, b)
    }

    #[test]
    fn message_before_horizon_fails_the_run() {
        let b = UnitId(1);
        let (mut sched, a, _) = two_units(move |_, ctx| {
            ctx.schedule(b, SimTime(9.0), Ev::Label("late"))?;
            Ok(())
        });

        let err = sched.run(&mut NoopObserver).unwrap_err();
        match err {
            SchedError::UnitFailed { unit, worker, time, source, .. } => {
                assert_eq!(unit, a);
                assert_eq!(worker, WorkerId(0));
                assert_eq!(time, SimTime(5.0));
                assert!(matches!(
                    source,
                    UnitError::Causality { time, horizon, .. }
                        if time == SimTime(9.0) && horizon == SimTime(10.0)
                ));
            }
            other => panic!("expected UnitFailed, got {other:?}"),
        }
        assert_eq!(sched.state(), RunState::Failed);
        assert!(sched.unit(a).is_some(), "units are handed back after a failure");
        assert!(seen(&sched, b).is_empty());
    }

    #[test]
    fn message_at_or_after_horizon_is_delivered_next_round_in_order() {
        let b = UnitId(1);
        let (mut sched, a, _) = two_units(move |_, ctx| {
            ctx.schedule(b, SimTime(15.0), Ev::Label("from-a"))?;
            Ok(())
        });
        let mut rec = Recorder::default();
        let stats = sched.run(&mut rec).unwrap();

        assert_eq!(seen(&sched, a), vec![(5.0, Ev::Label("a"))]);
        assert_eq!(seen(&sched, b), vec![(12.0, Ev::Label("b")), (15.0, Ev::Label("from-a"))]);

        assert_eq!(rec.run_start, Some((SimTime(10.0), 2)));
        assert_eq!(rec.starts, vec![(1, SimTime(10.0)), (2, SimTime(20.0))]);
        assert_eq!(rec.rounds[0].per_worker, vec![1, 0]);
        assert_eq!(rec.rounds[0].queued, 1);
        assert_eq!(rec.rounds[0].staged, 1);
        assert_eq!(rec.rounds[1].per_worker, vec![0, 2]);
        assert_eq!(rec.rounds[1].pending(), 0);

        assert_eq!(stats.rounds, 2);
        assert_eq!(stats.seeded, 2);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.produced, 1);
        assert_eq!(stats.horizon_delta, SimTime(10.0));
        assert_eq!(stats.final_horizon, SimTime(20.0));
        assert_eq!(rec.finished.as_ref(), Some(&stats));
        assert_eq!(sched.stats(), &stats);
        assert_eq!(sched.state(), RunState::Finished);
    }

    #[test]
    fn message_exactly_at_horizon_waits_for_next_round() {
        let b = UnitId(1);
        let (mut sched, _, _) = two_units(move |_, ctx| {
            ctx.schedule(b, SimTime(10.0), Ev::Label("edge"))?;
            Ok(())
        });
        let mut rec = Recorder::default();
        sched.run(&mut rec).unwrap();

        assert_eq!(seen(&sched, b), vec![(10.0, Ev::Label("edge")), (12.0, Ev::Label("b"))]);
        assert_eq!(rec.rounds[0].per_worker, vec![1, 0]);
        assert_eq!(rec.rounds[1].per_worker, vec![0, 2]);
    }

    #[test]
    fn chain_across_three_workers_terminates_once_drained() {
        let mut sched = Scheduler::new(SimConfig::with_workers(3)).unwrap();
        for i in 0..3u32 {
            let next = UnitId((i + 1) % 3);
            let unit = Script::new(1.0).on(move |m, ctx| {
                if let Ev::Hop(n) = *m.payload() {
                    if n < 5 {
                        ctx.schedule(next, ctx.now() + 1.0, Ev::Hop(n + 1))?;
                    }
                }
                Ok(())
            });
            sched.register(unit, WorkerId(i as u16)).unwrap();
        }
        sched.schedule(UnitId(0), SimTime(0.0), Ev::Hop(0)).unwrap();

        let mut rec = Recorder::default();
        let stats = sched.run(&mut rec).unwrap();

        assert_eq!(stats.delivered, 6);
        assert_eq!(stats.rounds, 6);
        assert_eq!(stats.undelivered, 0);
        assert_eq!(seen(&sched, UnitId(0)), vec![(0.0, Ev::Hop(0)), (3.0, Ev::Hop(3))]);
        assert_eq!(seen(&sched, UnitId(2)), vec![(2.0, Ev::Hop(2)), (5.0, Ev::Hop(5))]);
        assert!(rec.rounds.iter().all(|r| r.delivered == 1));
        assert_eq!(stats.workers.iter().map(|w| w.delivered).collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let single = ring_run(1);
        assert!(single.iter().map(Vec::len).sum::<usize>() > 20);
        for workers in [2, 3, 4] {
            assert_eq!(ring_run(workers), single, "{workers} workers");
        }
    }

    #[test]
    fn initialize_may_seed_messages() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let a = sched
            .register(
                Script::new(2.0).on_init(|ctx| {
                    ctx.schedule_self(SimTime(3.0), Ev::Label("boot"))?;
                    Ok(())
                }),
                WorkerId(1),
            )
            .unwrap();
        let stats = sched.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.seeded, 1);
        assert_eq!(seen(&sched, a), vec![(3.0, Ev::Label("boot"))]);
    }

    #[test]
    fn no_units_is_an_empty_run() {
        let mut sched: Scheduler<Script> = Scheduler::new(SimConfig::with_workers(4)).unwrap();
        let stats = sched.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.rounds, 0);
        assert_eq!(stats.delivered, 0);
        assert_eq!(sched.state(), RunState::Finished);
    }
}

// ── Horizon policy and end time ───────────────────────────────────────────────

#[cfg(test)]
mod horizon {
    use super::*;

    fn sparse(skip: bool) -> (Scheduler<Script>, UnitId) {
        let config = SimConfig { num_workers: 2, skip_idle_rounds: skip, ..SimConfig::default() };
        let mut sched = Scheduler::new(config).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        sched.schedule(a, SimTime(0.0), Ev::Label("early")).unwrap();
        sched.schedule(a, SimTime(1000.0), Ev::Label("late")).unwrap();
        (sched, a)
    }

    #[test]
    fn fixed_step_walks_through_idle_rounds() {
        let (mut sched, a) = sparse(false);
        let stats = sched.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.rounds, 1000);
        assert_eq!(seen(&sched, a).len(), 2);
    }

    #[test]
    fn skip_idle_jumps_to_pending_work() {
        let (mut sched, a) = sparse(true);
        let mut rec = Recorder::default();
        let stats = sched.run(&mut rec).unwrap();
        assert_eq!(stats.rounds, 2);
        assert_eq!(rec.starts[1], (2, SimTime(1001.0)));
        assert_eq!(seen(&sched, a), vec![(0.0, Ev::Label("early")), (1000.0, Ev::Label("late"))]);
    }

    #[test]
    fn end_time_stops_the_run_and_counts_leftovers() {
        let config = SimConfig { end_time: Some(SimTime(5.5)), ..SimConfig::default() };
        let mut sched = Scheduler::new(config).unwrap();
        let a = sched
            .register(
                Script::new(1.0).on(|_, ctx| {
                    ctx.schedule_self(ctx.now() + 1.0, Ev::Label("tick"))?;
                    Ok(())
                }),
                WorkerId(0),
            )
            .unwrap();
        sched.schedule(a, SimTime(0.0), Ev::Label("tick")).unwrap();

        let stats = sched.run(&mut NoopObserver).unwrap();
        let times: Vec<f64> = seen(&sched, a).iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.undelivered, 1);
        assert_eq!(stats.final_horizon, SimTime(6.0));
    }

    #[test]
    fn lookahead_below_resolution_at_start_is_rejected() {
        let config = SimConfig { start_time: SimTime(1.0e17), ..SimConfig::default() };
        let mut sched = Scheduler::new(config).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        sched.schedule(a, SimTime(1.0e17 + 64.0), Ev::Label("far")).unwrap();

        assert_eq!(
            sched.run(&mut NoopObserver).unwrap_err(),
            SchedError::HorizonStalled { current: SimTime(1.0e17), next: SimTime(1.0e17) }
        );
        assert_eq!(sched.state(), RunState::Failed);
        assert!(seen(&sched, a).is_empty());
    }

    #[test]
    fn horizon_that_stops_moving_mid_run_fails() {
        // Spacing between doubles is 1.0 below 2^53 and 2.0 above it.
        let top = 2f64.powi(53);
        let config = SimConfig { start_time: SimTime(top - 4.0), ..SimConfig::default() };
        let mut sched = Scheduler::new(config).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        sched.schedule(a, SimTime(top + 96.0), Ev::Label("far")).unwrap();

        assert_eq!(
            sched.run(&mut NoopObserver).unwrap_err(),
            SchedError::HorizonStalled { current: SimTime(top), next: SimTime(top) }
        );
        assert_eq!(sched.state(), RunState::Failed);
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel {
    use super::*;

    #[test]
    fn unit_cancellation_is_idempotent() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let b = UnitId(1);
        let mut pending: Option<MessageRef> = None;
        let a = sched
            .register(
                Script::new(1.0).on(move |m, ctx| {
                    match *m.payload() {
                        Ev::Label("start") => {
                            pending = Some(ctx.schedule(b, SimTime(50.0), Ev::Label("doomed"))?);
                            ctx.schedule_self(SimTime(2.0), Ev::Label("cancel"))?;
                        }
                        Ev::Label("cancel") => {
                            if let Some(h) = pending {
                                ctx.unschedule(&h)?;
                                ctx.unschedule(&h)?;
                            }
                        }
                        _ => {}
                    }
                    Ok(())
                }),
                WorkerId(0),
            )
            .unwrap();
        sched.register(Script::new(1.0), WorkerId(1)).unwrap();
        sched.schedule(a, SimTime(1.0), Ev::Label("start")).unwrap();

        let stats = sched.run(&mut NoopObserver).unwrap();
        assert!(seen(&sched, b).is_empty());
        assert_eq!(stats.cancelled, 1, "the second cancel finds nothing");
        assert_eq!(stats.rounds, 3);
    }

    #[test]
    fn seed_can_be_withdrawn_before_the_run() {
        let mut sched = Scheduler::new(SimConfig::default()).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        let h = sched.schedule(a, SimTime(4.0), Ev::Label("x")).unwrap();
        sched.schedule(a, SimTime(5.0), Ev::Label("y")).unwrap();

        assert!(sched.unschedule(&h).unwrap());
        assert!(!sched.unschedule(&h).unwrap());

        let stats = sched.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.seeded, 1);
        assert_eq!(seen(&sched, a), vec![(5.0, Ev::Label("y"))]);
    }
}

// ── Setup validation and lifecycle ────────────────────────────────────────────

#[cfg(test)]
mod setup {
    use super::*;

    #[test]
    fn empty_worker_pool_is_rejected() {
        let r: Result<Scheduler<Script>, _> = Scheduler::new(SimConfig::with_workers(0));
        assert!(matches!(r, Err(SchedError::Config(_))));
    }

    #[test]
    fn register_validates_worker_and_lookahead() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        assert!(matches!(
            sched.register(Script::new(1.0), WorkerId(2)),
            Err(SchedError::WorkerOutOfRange { num_workers: 2, .. })
        ));
        assert!(matches!(
            sched.register(Script::new(0.0), WorkerId(0)),
            Err(SchedError::InvalidLookahead { .. })
        ));
        assert!(matches!(
            sched.register(Script::new(f64::NAN), WorkerId(0)),
            Err(SchedError::InvalidLookahead { .. })
        ));
        assert_eq!(sched.register(Script::new(1.0), WorkerId(1)).unwrap(), UnitId(0));
        assert_eq!(sched.worker_of(UnitId(0)), Some(WorkerId(1)));
    }

    #[test]
    fn seeds_are_validated() {
        let config = SimConfig { start_time: SimTime(10.0), ..SimConfig::default() };
        let mut sched = Scheduler::new(config).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();

        assert!(matches!(
            sched.schedule(a, SimTime(9.0), Ev::Label("x")),
            Err(SchedError::Setup(UnitError::Causality { origin: UnitId::SETUP, .. }))
        ));
        assert!(matches!(
            sched.schedule(a, SimTime(f64::NAN), Ev::Label("x")),
            Err(SchedError::Setup(UnitError::InvalidTime(_)))
        ));
        assert_eq!(
            sched.schedule(UnitId(7), SimTime(10.0), Ev::Label("x")).unwrap_err(),
            SchedError::UnknownUnit(UnitId(7))
        );
        assert!(sched.schedule(a, SimTime(10.0), Ev::Label("x")).is_ok());
    }

    #[test]
    fn unregister_returns_the_unit_and_drops_its_seeds() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        let b = sched.register(Script::new(0.5), WorkerId(1)).unwrap();
        sched.schedule(a, SimTime(1.0), Ev::Label("a")).unwrap();
        sched.schedule(b, SimTime(1.0), Ev::Label("b")).unwrap();

        let unit = sched.unregister(b).unwrap();
        assert_eq!(unit.lookahead, 0.5);
        assert_eq!(sched.unregister(b).unwrap_err(), SchedError::UnknownUnit(b));
        assert!(sched.unit(b).is_none());

        let stats = sched.run(&mut NoopObserver).unwrap();
        assert_eq!(stats.seeded, 1);
        assert_eq!(stats.horizon_delta, SimTime(1.0), "unregistered units do not bound delta");
        assert_eq!(sched.units().map(|(id, _)| id).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn everything_after_run_is_already_started() {
        let mut sched = Scheduler::new(SimConfig::default()).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        let h = sched.schedule(a, SimTime(0.0), Ev::Label("x")).unwrap();
        sched.run(&mut NoopObserver).unwrap();

        assert_eq!(sched.register(Script::new(1.0), WorkerId(0)).unwrap_err(), SchedError::AlreadyStarted);
        assert_eq!(sched.schedule(a, SimTime(1.0), Ev::Label("y")).unwrap_err(), SchedError::AlreadyStarted);
        assert_eq!(sched.unschedule(&h).unwrap_err(), SchedError::AlreadyStarted);
        assert_eq!(sched.run(&mut NoopObserver).unwrap_err(), SchedError::AlreadyStarted);
    }

    #[test]
    fn unregister_after_run_tears_down() {
        let mut sched = Scheduler::new(SimConfig::default()).unwrap();
        let a = sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        sched.schedule(a, SimTime(2.0), Ev::Label("x")).unwrap();
        sched.run(&mut NoopObserver).unwrap();

        let unit = sched.unregister(a).unwrap();
        assert_eq!(unit.seen, vec![(2.0, Ev::Label("x"))]);
        assert_eq!(sched.state(), RunState::Finished);
        assert_eq!(sched.units().count(), 0);
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod faults {
    use super::*;

    #[test]
    fn model_error_fails_the_run() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        let a = sched
            .register(
                Script::new(1.0).on(|_, _| Err(UnitError::Model("bad state".into()))),
                WorkerId(1),
            )
            .unwrap();
        sched.schedule(a, SimTime(0.5), Ev::Label("x")).unwrap();

        let err = sched.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            SchedError::UnitFailed { worker: WorkerId(1), source: UnitError::Model(_), .. }
        ));
        assert_eq!(sched.state(), RunState::Failed);
    }

    #[test]
    fn swallowed_schedule_error_still_fails() {
        let mut sched = Scheduler::new(SimConfig::default()).unwrap();
        let a = sched
            .register(
                Script::new(5.0).on(|_, ctx| {
                    let _ = ctx.schedule_self(SimTime(0.0), Ev::Label("past"));
                    Ok(())
                }),
                WorkerId(0),
            )
            .unwrap();
        sched.schedule(a, SimTime(1.0), Ev::Label("x")).unwrap();

        assert!(matches!(
            sched.run(&mut NoopObserver),
            Err(SchedError::UnitFailed { source: UnitError::Causality { .. }, .. })
        ));
    }

    #[test]
    fn panicking_unit_is_reported_without_deadlock() {
        let mut sched = Scheduler::new(SimConfig::with_workers(3)).unwrap();
        for w in 0..3u16 {
            sched
                .register(
                    Script::new(1.0).on(move |_, ctx| {
                        if w == 1 {
                            panic!("boom");
                        }
                        ctx.schedule_self(ctx.now() + 1.0, Ev::Label("again"))?;
                        Ok(())
                    }),
                    WorkerId(w),
                )
                .unwrap();
        }
        for u in 0..3 {
            sched.schedule(UnitId(u), SimTime(0.0), Ev::Label("go")).unwrap();
        }

        match sched.run(&mut NoopObserver).unwrap_err() {
            SchedError::WorkerPanicked { worker, context, message } => {
                assert_eq!(worker, WorkerId(1));
                assert!(context.is_some_and(|c| c.contains("UnitId(1)")));
                assert_eq!(message, "boom");
            }
            other => panic!("expected WorkerPanicked, got {other:?}"),
        }
        assert_eq!(sched.state(), RunState::Failed);
        assert_eq!(sched.units().count(), 3);
    }

    #[test]
    fn initialize_error_aborts_before_round_one() {
        let mut sched = Scheduler::new(SimConfig::with_workers(2)).unwrap();
        sched.register(Script::new(1.0), WorkerId(0)).unwrap();
        let bad = sched
            .register(
                Script::new(1.0).on_init(|_| Err(UnitError::Model("no config".into()))),
                WorkerId(1),
            )
            .unwrap();

        let mut rec = Recorder::default();
        let err = sched.run(&mut rec).unwrap_err();
        assert!(matches!(err, SchedError::Initialize { unit, .. } if unit == bad));
        assert!(rec.run_start.is_none());
        assert_eq!(sched.units().count(), 2);
    }
}
