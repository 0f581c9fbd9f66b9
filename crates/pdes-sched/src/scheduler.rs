//! The `Scheduler`: unit registry, setup-time seeding, and the coordinator
//! side of the round barrier.

use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, info};

use pdes_core::{Horizon, MessageId, SimConfig, SimTime, UnitId, WorkerId};
use pdes_queue::{Message, MessageRef, Postbox, Route};
use pdes_unit::{Context, SimUnit, UnitError};

use crate::worker::{Command, RoundReport, UnitSlot, Worker, WorkerOutcome};
use crate::{RoundSummary, RunObserver, RunStats, SchedError, SchedResult};

/// Lifecycle of a [`Scheduler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Accepting registrations and seed messages.
    Setup,
    Running,
    /// The run ended normally.  Units are available for inspection.
    Finished,
    /// The run ended with an error.  Units that survived are still available.
    Failed,
}

struct Registered<U> {
    unit:     U,
    worker:   WorkerId,
    next_seq: u64,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Owns every unit and drives a run from setup to termination.
///
/// ```text
/// Setup ──run()──▶ Running ──▶ Finished
///                          └──▶ Failed
/// ```
///
/// A scheduler runs once.  After `run` has started, every setup call except
/// [`unregister`](Self::unregister) fails with [`SchedError::AlreadyStarted`].
pub struct Scheduler<U: SimUnit> {
    config:         SimConfig,
    state:          RunState,
    /// Indexed by `UnitId`.  `None` marks an unregistered id, which is never
    /// reused.
    units:          Vec<Option<Registered<U>>>,
    seeds:          Vec<Message<U::Payload>>,
    next_setup_seq: u64,
    stats:          RunStats,
}

impl<U: SimUnit> Scheduler<U> {
    pub fn new(config: SimConfig) -> SchedResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state:          RunState::Setup,
            units:          Vec::new(),
            seeds:          Vec::new(),
            next_setup_seq: 0,
            stats:          RunStats::default(),
        })
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Add `unit` to the run and pin it to `worker`.
    pub fn register(&mut self, unit: U, worker: WorkerId) -> SchedResult<UnitId> {
        self.ensure_setup()?;
        if worker.index() >= self.config.num_workers {
            return Err(SchedError::WorkerOutOfRange {
                worker,
                num_workers: self.config.num_workers,
            });
        }

        let id = UnitId::try_from(self.units.len())
            .ok()
            .filter(|id| *id != UnitId::INVALID)
            .ok_or(SchedError::TooManyUnits)?;

        let lookahead = unit.lookahead();
        if !lookahead.is_finite() || lookahead.0 <= 0.0 {
            return Err(SchedError::InvalidLookahead { unit: id, lookahead: lookahead.0 });
        }

        self.units.push(Some(Registered { unit, worker, next_seq: 0 }));
        Ok(id)
    }

    /// Remove a unit and hand it back: during setup, or after the run for
    /// scenario teardown.
    ///
    /// Seeds addressed to it are discarded.  Its id is not reused.
    pub fn unregister(&mut self, id: UnitId) -> SchedResult<U> {
        if self.state == RunState::Running {
            return Err(SchedError::AlreadyStarted);
        }
        let registered = self
            .units
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(SchedError::UnknownUnit(id))?;

        let before = self.seeds.len();
        self.seeds.retain(|m| m.target() != id);
        if self.seeds.len() < before {
            debug!(unit = id.0, dropped = before - self.seeds.len(), "dropped seeds of unregistered unit");
        }
        Ok(registered.unit)
    }

    /// Queue an initial message from the harness.
    ///
    /// `time` may not be earlier than the configured start time.
    pub fn schedule(
        &mut self,
        target:  UnitId,
        time:    SimTime,
        payload: U::Payload,
    ) -> SchedResult<MessageRef> {
        self.ensure_setup()?;
        if !time.is_finite() {
            return Err(UnitError::InvalidTime(time.0).into());
        }
        if time < self.config.start_time {
            return Err(UnitError::Causality {
                origin:  UnitId::SETUP,
                target,
                time,
                horizon: self.config.start_time,
                payload: format!("{payload:?}"),
            }
            .into());
        }
        if self.worker_of(target).is_none() {
            return Err(SchedError::UnknownUnit(target));
        }

        let id = MessageId::new(UnitId::SETUP, self.next_setup_seq);
        self.next_setup_seq += 1;
        let message = Message::new(id, target, time, payload);
        let handle = message.handle();
        self.seeds.push(message);
        Ok(handle)
    }

    /// Withdraw a seed.  Returns `false` if it was already withdrawn.
    pub fn unschedule(&mut self, handle: &MessageRef) -> SchedResult<bool> {
        self.ensure_setup()?;
        let before = self.seeds.len();
        self.seeds.retain(|m| m.id() != handle.id);
        Ok(self.seeds.len() < before)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Statistics of the last successful run.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Number of ids handed out, including unregistered ones.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn unit(&self, id: UnitId) -> Option<&U> {
        self.units.get(id.index())?.as_ref().map(|r| &r.unit)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut U> {
        self.units.get_mut(id.index())?.as_mut().map(|r| &mut r.unit)
    }

    /// All registered units in id order.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &U)> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (UnitId(i as u32), &r.unit)))
    }

    pub fn worker_of(&self, id: UnitId) -> Option<WorkerId> {
        self.units.get(id.index())?.as_ref().map(|r| r.worker)
    }

    fn ensure_setup(&self) -> SchedResult<()> {
        match self.state {
            RunState::Setup => Ok(()),
            _ => Err(SchedError::AlreadyStarted),
        }
    }

    // ── Run ───────────────────────────────────────────────────────────────

    /// Execute the whole simulation and block until it terminates.
    ///
    /// Returns once every worker has exited.  On success the statistics are
    /// also kept in [`stats`](Self::stats).  The first fault, in worker
    /// order, stops the run and is returned as-is.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> SchedResult<RunStats> {
        self.ensure_setup()?;
        self.state = RunState::Running;

        match self.execute(observer) {
            Ok(stats) => {
                self.state = RunState::Finished;
                info!(
                    rounds      = stats.rounds,
                    delivered   = stats.delivered,
                    undelivered = stats.undelivered,
                    horizon     = stats.final_horizon.0,
                    "run finished"
                );
                observer.on_run_end(&stats);
                self.stats = stats.clone();
                Ok(stats)
            }
            Err(e) => {
                self.state = RunState::Failed;
                error!(error = %e, "run failed");
                Err(e)
            }
        }
    }

    fn execute<O: RunObserver>(&mut self, observer: &mut O) -> SchedResult<RunStats> {
        let num_workers = self.config.num_workers;
        let start = self.config.start_time;

        let Some(delta) = self.units.iter().flatten().map(|r| r.unit.lookahead()).min() else {
            info!("no units registered, nothing to run");
            observer.on_run_start(SimTime::ZERO, num_workers);
            return Ok(RunStats { final_horizon: start, ..RunStats::default() });
        };
        let first = Horizon::first(start, delta);
        if first.current <= start {
            return Err(SchedError::HorizonStalled { current: start, next: first.current });
        }

        // ── Distribute units ──────────────────────────────────────────────
        let arena = std::mem::take(&mut self.units);
        let arena_len = arena.len();
        let mut routes = Vec::with_capacity(arena_len);
        let mut per_worker: Vec<Vec<UnitSlot<U>>> = (0..num_workers).map(|_| Vec::new()).collect();
        for (i, entry) in arena.into_iter().enumerate() {
            match entry {
                Some(Registered { unit, worker, next_seq }) => {
                    let slots = &mut per_worker[worker.index()];
                    routes.push(Route { worker, slot: slots.len() as u32 });
                    slots.push(UnitSlot { id: UnitId(i as u32), unit, next_seq });
                }
                None => routes.push(Route::VACANT),
            }
        }
        self.units = (0..arena_len).map(|_| None).collect();

        let postbox = Postbox::new(routes, num_workers);
        let setup = self
            .seeds
            .drain(..)
            .try_for_each(|seed| {
                let target = seed.target();
                postbox.post(0, seed).map_err(|_| SchedError::UnknownUnit(target))
            })
            .and_then(|()| initialize_all(&mut per_worker, &postbox, start));
        if let Err(e) = setup {
            self.restore(per_worker);
            return Err(e);
        }

        let seeded = postbox.pending_deliveries(0) as u64;
        info!(
            units   = per_worker.iter().map(Vec::len).sum::<usize>(),
            workers = num_workers,
            delta   = delta.0,
            seeded,
            "run starting"
        );
        observer.on_run_start(delta, num_workers);

        // ── Rounds ────────────────────────────────────────────────────────
        let config = &self.config;
        let (result, outcomes) = thread::scope(|scope| {
            let (report_tx, report_rx) = channel::unbounded();
            let mut commands = Vec::with_capacity(num_workers);
            let mut handles = Vec::with_capacity(num_workers);
            let mut spawn_error = None;

            for (w, slots) in per_worker.into_iter().enumerate() {
                let id = WorkerId(w as u16);
                let (command_tx, command_rx) = channel::bounded(1);
                let worker = Worker::new(id, slots, &postbox, config, command_rx, report_tx.clone());
                match thread::Builder::new()
                    .name(format!("pdes-worker-{w}"))
                    .spawn_scoped(scope, move || worker.run())
                {
                    Ok(handle) => {
                        commands.push(command_tx);
                        handles.push((id, handle));
                    }
                    Err(e) => {
                        spawn_error = Some(SchedError::Spawn { worker: id, message: e.to_string() });
                        break;
                    }
                }
            }
            // Only workers hold report senders from here on.
            drop(report_tx);

            let result = match spawn_error {
                Some(e) => Err(e),
                None => {
                    let coordinator = Coordinator { config, postbox: &postbox, commands: &commands, reports: report_rx };
                    coordinator.drive(first, observer)
                }
            };

            for command in &commands {
                // A worker that already exited has dropped its receiver.
                let _ = command.send(Command::Terminate);
            }
            drop(commands);

            let outcomes: Vec<_> = handles
                .into_iter()
                .map(|(id, handle)| {
                    handle.join().map_err(|_| SchedError::WorkerPanicked {
                        worker:  id,
                        context: None,
                        message: "worker thread panicked outside a round".to_owned(),
                    })
                })
                .collect();
            (result, outcomes)
        });

        // ── Hand units back ───────────────────────────────────────────────
        let mut lost = None;
        let mut worker_stats = Vec::with_capacity(num_workers);
        for outcome in outcomes {
            match outcome {
                Ok(WorkerOutcome { slots, stats }) => {
                    self.restore_slots(stats.worker, slots);
                    worker_stats.push(stats);
                }
                Err(e) => {
                    lost.get_or_insert(e);
                }
            }
        }

        let progress = result?;
        if let Some(e) = lost {
            return Err(e);
        }

        let mut stats = RunStats {
            rounds:        progress.rounds,
            horizon_delta: delta,
            final_horizon: progress.final_horizon,
            seeded,
            undelivered:   progress.undelivered,
            ..RunStats::default()
        };
        stats.absorb(worker_stats);
        Ok(stats)
    }

    fn restore(&mut self, per_worker: Vec<Vec<UnitSlot<U>>>) {
        for (w, slots) in per_worker.into_iter().enumerate() {
            self.restore_slots(WorkerId(w as u16), slots);
        }
    }

    fn restore_slots(&mut self, worker: WorkerId, slots: Vec<UnitSlot<U>>) {
        for UnitSlot { id, unit, next_seq } in slots {
            self.units[id.index()] = Some(Registered { unit, worker, next_seq });
        }
    }
}

/// Call every unit's `initialize` as round 0.
///
/// Reports the failure of the lowest-numbered worker, and within it the
/// first unit in registration order.
fn initialize_all<U: SimUnit>(
    per_worker: &mut [Vec<UnitSlot<U>>],
    postbox:    &Postbox<U::Payload>,
    start:      SimTime,
) -> SchedResult<()> {
    let init_worker = |slots: &mut Vec<UnitSlot<U>>| -> SchedResult<()> {
        for UnitSlot { id, unit, next_seq } in slots.iter_mut() {
            let mut ctx = Context::new(*id, start, start, 0, postbox, next_seq);
            let fault = unit.initialize(&mut ctx).err().or_else(|| ctx.take_fault());
            if let Some(source) = fault {
                return Err(SchedError::Initialize { unit: *id, source });
            }
        }
        Ok(())
    };

    #[cfg(feature = "parallel")]
    let results: Vec<SchedResult<()>> = {
        use rayon::prelude::*;
        per_worker.par_iter_mut().map(init_worker).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<SchedResult<()>> = per_worker.iter_mut().map(init_worker).collect();

    results.into_iter().collect()
}

// ── Coordinator ───────────────────────────────────────────────────────────────

struct Progress {
    rounds:        u64,
    final_horizon: SimTime,
    undelivered:   u64,
}

/// The barrier: releases all workers into a round, waits for all reports,
/// and decides what happens next.
struct Coordinator<'a, P> {
    config:   &'a SimConfig,
    postbox:  &'a Postbox<P>,
    commands: &'a [Sender<Command>],
    reports:  Receiver<RoundReport>,
}

impl<P> Coordinator<'_, P> {
    fn drive<O: RunObserver>(&self, mut horizon: Horizon, observer: &mut O) -> SchedResult<Progress> {
        let mut round = 0;
        loop {
            round += 1;
            observer.on_round_start(round, horizon.current);
            for (w, command) in self.commands.iter().enumerate() {
                command
                    .send(Command::Advance { round, horizon: horizon.current })
                    .map_err(|_| SchedError::WorkerLost(WorkerId(w as u16)))?;
            }

            let reports = self.collect(round)?;
            let summary = RoundSummary {
                round,
                horizon:    horizon.current,
                delivered:  reports.iter().map(|r| r.delivered).sum(),
                per_worker: reports.iter().map(|r| r.delivered).collect(),
                queued:     reports.iter().map(|r| r.queued as u64).sum(),
                staged:     self.postbox.pending_deliveries(round) as u64,
            };
            debug!(
                round,
                horizon   = horizon.current.0,
                delivered = summary.delivered,
                pending   = summary.pending(),
                "round complete"
            );
            observer.on_round_end(&summary);

            let queued_earliest = reports.iter().filter_map(|r| r.next_time).min();
            if let Some(fault) = reports.into_iter().find_map(|r| r.fault) {
                return Err(fault);
            }

            if summary.pending() == 0 {
                return Ok(Progress { rounds: round, final_horizon: horizon.current, undelivered: 0 });
            }
            if self.config.reached_end(horizon.current) {
                return Ok(Progress {
                    rounds:        round,
                    final_horizon: horizon.current,
                    undelivered:   summary.pending(),
                });
            }

            let previous = horizon.current;
            if self.config.skip_idle_rounds {
                match queued_earliest.into_iter().chain(self.postbox.earliest(round)).min() {
                    Some(earliest) => horizon.advance_to_pending(earliest),
                    None           => horizon.advance(),
                }
            } else {
                horizon.advance();
            }
            // `delta` below the float spacing at `previous` rounds away.
            if horizon.current <= previous {
                return Err(SchedError::HorizonStalled { current: previous, next: horizon.current });
            }
        }
    }

    /// Wait for one report per worker, returned in worker order.
    fn collect(&self, round: u64) -> SchedResult<Vec<RoundReport>> {
        let n = self.commands.len();
        let mut reports: Vec<RoundReport> = Vec::with_capacity(n);
        while reports.len() < n {
            match self.reports.recv() {
                Ok(report) => {
                    debug_assert_eq!(report.round, round);
                    reports.push(report);
                }
                Err(_) => {
                    let missing = (0..n)
                        .map(|w| WorkerId(w as u16))
                        .find(|w| reports.iter().all(|r| r.worker != *w))
                        .unwrap_or(WorkerId::INVALID);
                    return Err(SchedError::WorkerLost(missing));
                }
            }
        }
        reports.sort_by_key(|r| r.worker);
        Ok(reports)
    }
}
