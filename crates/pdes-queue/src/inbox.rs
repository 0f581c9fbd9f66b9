//! `Inbox` — the thread-safe side door into a worker's queue.
//!
//! # Round parity
//!
//! Producers running in round `r` post into slot `r % 2`.  The owning worker
//! merges slot `(r - 1) % 2` when it starts round `r`, i.e. while every
//! producer is writing to the *other* slot.  A message produced during a
//! round therefore becomes visible to its target exactly at the start of the
//! next round, independent of which thread produced it or when.
//!
//! Setup and `initialize` count as round 0.

use parking_lot::Mutex;

use pdes_core::SimTime;

use crate::{Message, MessageRef};

/// Something posted to a worker from outside its own drain loop.
#[derive(Debug)]
pub enum Envelope<P> {
    /// Insert the message into the target's queue.
    Deliver(Message<P>),
    /// Remove the referenced message if it is still queued.
    Cancel(MessageRef),
}

/// Two parity slots of staged envelopes for one worker.
pub struct Inbox<P> {
    slots: [Mutex<Vec<Envelope<P>>>; 2],
}

impl<P> Default for Inbox<P> {
    fn default() -> Self {
        Self { slots: [Mutex::new(Vec::new()), Mutex::new(Vec::new())] }
    }
}

#[inline]
fn parity(round: u64) -> usize {
    (round % 2) as usize
}

impl<P> Inbox<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `envelope` as produced during `round`.
    ///
    /// Bounded wait: the lock is only ever held for a push or a swap.
    pub fn post(&self, round: u64, envelope: Envelope<P>) {
        self.slots[parity(round)].lock().push(envelope);
    }

    /// Take everything that was produced during `round`.
    pub fn take(&self, round: u64) -> Vec<Envelope<P>> {
        std::mem::take(&mut *self.slots[parity(round)].lock())
    }

    /// Number of staged deliveries (cancellations excluded) from `round`.
    pub fn pending_deliveries(&self, round: u64) -> usize {
        self.slots[parity(round)]
            .lock()
            .iter()
            .filter(|e| matches!(e, Envelope::Deliver(_)))
            .count()
    }

    /// Earliest time among staged deliveries from `round`.
    pub fn earliest(&self, round: u64) -> Option<SimTime> {
        self.slots[parity(round)]
            .lock()
            .iter()
            .filter_map(|e| match e {
                Envelope::Deliver(m) => Some(m.time()),
                Envelope::Cancel(_)  => None,
            })
            .min()
    }
}
