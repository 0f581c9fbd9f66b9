//! Message-executor worker thread.
//!
//! ```text
//!            Advance(r, H)                 drained ≤ H
//!   Idle ─────────────────▶ Draining ─────────────────▶ AwaitingBarrier
//!                              ▲                              │
//!                              └────────── Advance ───────────┘
//!   any state ── Terminate / fault / coordinator gone ──▶ Terminated
//! ```
//!
//! A worker only ever touches its own queue and its own units.  Everything
//! it produces leaves through the shared [`Postbox`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, trace, warn};

use pdes_core::{SimConfig, SimTime, UnitId, WorkerId};
use pdes_queue::{Message, MessageQueue, Postbox};
use pdes_unit::{Context, SimUnit};

use crate::{SchedError, WorkerStats};

// ── Protocol ──────────────────────────────────────────────────────────────────

/// Coordinator → worker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    /// Run round `round`, delivering everything up to `horizon`.
    Advance { round: u64, horizon: SimTime },
    /// Leave the run loop and hand the units back.
    Terminate,
}

/// Worker → coordinator.  Sending it is how a worker arrives at the barrier.
#[derive(Debug)]
pub(crate) struct RoundReport {
    pub worker:    WorkerId,
    pub round:     u64,
    pub delivered: u64,
    /// Queue length after the drain.
    pub queued:    usize,
    /// Earliest message still queued.
    pub next_time: Option<SimTime>,
    pub fault:     Option<SchedError>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum WorkerState {
    Idle,
    Draining,
    AwaitingBarrier,
    Terminated,
}

// ── Units owned by a worker ───────────────────────────────────────────────────

/// One unit plus its private message counter.
pub(crate) struct UnitSlot<U> {
    pub id:       UnitId,
    pub unit:     U,
    pub next_seq: u64,
}

/// What a worker thread hands back when it exits.
pub(crate) struct WorkerOutcome<U> {
    pub slots: Vec<UnitSlot<U>>,
    pub stats: WorkerStats,
}

// ── Worker ────────────────────────────────────────────────────────────────────

pub(crate) struct Worker<'a, U: SimUnit> {
    id:       WorkerId,
    slots:    Vec<UnitSlot<U>>,
    queue:    MessageQueue<U::Payload>,
    postbox:  &'a Postbox<U::Payload>,
    config:   &'a SimConfig,
    commands: Receiver<Command>,
    reports:  Sender<RoundReport>,
    state:    WorkerState,
    stats:    WorkerStats,
}

impl<'a, U: SimUnit> Worker<'a, U> {
    pub fn new(
        id:       WorkerId,
        slots:    Vec<UnitSlot<U>>,
        postbox:  &'a Postbox<U::Payload>,
        config:   &'a SimConfig,
        commands: Receiver<Command>,
        reports:  Sender<RoundReport>,
    ) -> Self {
        Self {
            id,
            slots,
            queue: MessageQueue::new(),
            postbox,
            config,
            commands,
            reports,
            state: WorkerState::Idle,
            stats: WorkerStats { worker: id, ..WorkerStats::default() },
        }
    }

    /// The thread body.  Returns once terminated, whatever the reason.
    pub fn run(mut self) -> WorkerOutcome<U> {
        while let Ok(command) = self.commands.recv() {
            let Command::Advance { round, horizon } = command else {
                break;
            };

            // A panic outside `process` (which has its own, more precise
            // guard) must still reach the coordinator, or every sibling
            // would wait at the barrier forever.
            let report = panic::catch_unwind(AssertUnwindSafe(|| self.run_round(round, horizon)))
                .unwrap_or_else(|panic| RoundReport {
                    worker:    self.id,
                    round,
                    delivered: 0,
                    queued:    0,
                    next_time: None,
                    fault:     Some(SchedError::WorkerPanicked {
                        worker:  self.id,
                        context: None,
                        message: panic_message(panic.as_ref()),
                    }),
                });

            let failed = report.fault.is_some();
            self.state = WorkerState::AwaitingBarrier;
            if self.reports.send(report).is_err() {
                warn!(worker = self.id.0, "coordinator hung up");
                break;
            }
            if failed {
                break;
            }
        }

        self.state = WorkerState::Terminated;
        debug!(worker = self.id.0, state = ?self.state, delivered = self.stats.delivered, "worker exiting");
        WorkerOutcome { slots: self.slots, stats: self.stats }
    }

    fn run_round(&mut self, round: u64, horizon: SimTime) -> RoundReport {
        self.state = WorkerState::Draining;

        let staged = self.postbox.inbox(self.id).take(round - 1);
        self.stats.cancelled += self.queue.merge(staged) as u64;

        let limit = self.config.delivery_limit(horizon);
        let batch = self.queue.pop_up_to(limit);
        let mut delivered = 0;
        let mut fault = None;

        for message in &batch {
            if let Err(e) = self.deliver(message, round, horizon) {
                fault = Some(e);
                break;
            }
            delivered += 1;
        }

        self.stats.delivered += delivered;
        if delivered > 0 {
            self.stats.busy_rounds += 1;
        } else {
            self.stats.idle_rounds += 1;
        }

        RoundReport {
            worker: self.id,
            round,
            delivered,
            queued: self.queue.len(),
            next_time: self.queue.next_time(),
            fault,
        }
    }

    /// Hand one message to its unit.
    fn deliver(
        &mut self,
        message: &Message<U::Payload>,
        round:   u64,
        horizon: SimTime,
    ) -> Result<(), SchedError> {
        let route = self.postbox.route(message.target()).map_err(|_| SchedError::UnknownUnit(message.target()))?;
        let UnitSlot { id, unit, next_seq } = &mut self.slots[route.slot as usize];
        debug_assert_eq!(*id, message.target());

        trace!(worker = self.id.0, unit = id.0, time = message.time().0, "deliver");

        let mut ctx = Context::new(*id, message.time(), horizon, round, self.postbox, next_seq);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| unit.process(message, &mut ctx)));
        self.stats.produced += ctx.produced();

        let source = match outcome {
            Ok(Ok(())) => match ctx.take_fault() {
                None    => return Ok(()),
                Some(e) => e,
            },
            Ok(Err(e)) => e,
            Err(panic) => {
                return Err(SchedError::WorkerPanicked {
                    worker:  self.id,
                    context: Some(format!(
                        " at {} in {} processing {:?}",
                        message.time(),
                        message.target(),
                        message.payload()
                    )),
                    message: panic_message(panic.as_ref()),
                });
            }
        };

        Err(SchedError::UnitFailed {
            unit:    message.target(),
            worker:  self.id,
            time:    message.time(),
            payload: format!("{:?}", message.payload()),
            source,
        })
    }
}

/// Best-effort text of a panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
