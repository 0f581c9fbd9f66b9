//! `Postbox` — the immutable routing table plus every worker's inbox.
//!
//! Built once when a run starts and shared by reference with all workers.
//! The routing table maps each `UnitId` to the worker that owns it and the
//! unit's slot in that worker's local arena, so a worker can go from a
//! message's target straight to the unit without a lookup structure of its
//! own.

use pdes_core::{SimTime, UnitId, WorkerId};

use crate::{Envelope, Inbox, Message, MessageRef, QueueError, QueueResult};

/// Where a unit lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub worker: WorkerId,
    /// Index into the owning worker's local unit list.
    pub slot:   u32,
}

impl Route {
    /// Marks an arena slot whose unit was unregistered.
    pub const VACANT: Route = Route { worker: WorkerId::INVALID, slot: u32::MAX };
}

pub struct Postbox<P> {
    routes:  Vec<Route>,
    inboxes: Vec<Inbox<P>>,
}

impl<P> Postbox<P> {
    /// `routes` is indexed by `UnitId`; every non-vacant route must name a
    /// worker below `num_workers`.
    pub fn new(routes: Vec<Route>, num_workers: usize) -> Self {
        debug_assert!(routes
            .iter()
            .all(|r| *r == Route::VACANT || r.worker.index() < num_workers));
        Self {
            routes,
            inboxes: (0..num_workers).map(|_| Inbox::new()).collect(),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.inboxes.len()
    }

    pub fn unit_count(&self) -> usize {
        self.routes.len()
    }

    /// Owning worker and local slot of `unit`.
    #[inline]
    pub fn route(&self, unit: UnitId) -> QueueResult<Route> {
        match self.routes.get(unit.index()) {
            Some(&route) if route != Route::VACANT => Ok(route),
            _ => Err(QueueError::UnknownUnit(unit)),
        }
    }

    pub fn inbox(&self, worker: WorkerId) -> &Inbox<P> {
        &self.inboxes[worker.index()]
    }

    /// Stage `message` for its target's worker, as produced during `round`.
    pub fn post(&self, round: u64, message: Message<P>) -> QueueResult<()> {
        let route = self.route(message.target())?;
        self.inboxes[route.worker.index()].post(round, Envelope::Deliver(message));
        Ok(())
    }

    /// Stage a cancellation for the worker owning `handle.target`.
    pub fn cancel(&self, round: u64, handle: MessageRef) -> QueueResult<()> {
        let route = self.route(handle.target)?;
        self.inboxes[route.worker.index()].post(round, Envelope::Cancel(handle));
        Ok(())
    }

    /// Staged deliveries from `round` across every worker.
    pub fn pending_deliveries(&self, round: u64) -> usize {
        self.inboxes.iter().map(|i| i.pending_deliveries(round)).sum()
    }

    /// Earliest staged delivery from `round` across every worker.
    pub fn earliest(&self, round: u64) -> Option<SimTime> {
        self.inboxes.iter().filter_map(|i| i.earliest(round)).min()
    }
}
