//! `MessageQueue` — one worker's ordered buffer of pending messages.
//!
//! # Ordering
//!
//! Keyed by `(time, MessageId)`.  Time is the primary order; the message id
//! (origin unit, then the origin's own sequence number) breaks ties.  Both
//! parts are fixed when the message is created, so replaying identical inputs
//! yields an identical delivery order no matter how many workers run.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log n) `put`, O(log n) `remove` (the handle carries the
//! full key, so no search is needed), and O(k log n) for draining a batch of
//! k messages.

use std::collections::BTreeMap;

use pdes_core::{MessageId, SimTime};

use crate::{Envelope, Message, MessageRef};

/// A thread-confined priority queue of messages.
///
/// Only the owning worker calls into it.  Messages from other workers arrive
/// through [`Inbox`][crate::Inbox].
pub struct MessageQueue<P> {
    entries: BTreeMap<(SimTime, MessageId), Message<P>>,
}

impl<P> Default for MessageQueue<P> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<P> MessageQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `message`, keeping `(time, id)` order.
    ///
    /// Re-inserting an id that is already queued replaces the entry; ids are
    /// unique per run, so this only happens on caller error.
    pub fn put(&mut self, message: Message<P>) {
        self.entries.insert(message.key(), message);
    }

    /// Remove the message identified by `handle`.
    ///
    /// Returns `false` if it is not queued: already delivered, already
    /// cancelled, or never here.  That is the expected outcome of a cancel
    /// racing a delivery, not an error.
    pub fn remove(&mut self, handle: &MessageRef) -> bool {
        self.entries.remove(&handle.key()).is_some()
    }

    /// The earliest queued message, without removing it.
    pub fn peek_next(&self) -> Option<&Message<P>> {
        self.entries.values().next()
    }

    /// Time of the earliest queued message.
    pub fn next_time(&self) -> Option<SimTime> {
        self.entries.keys().next().map(|&(t, _)| t)
    }

    /// Remove and return the earliest message if its time is `<= limit`.
    pub fn pop_next_up_to(&mut self, limit: SimTime) -> Option<Message<P>> {
        let entry = self.entries.first_entry()?;
        if entry.key().0 > limit {
            return None;
        }
        Some(entry.remove())
    }

    /// Remove and return, in order, every message with `time <= limit`.
    ///
    /// Returns an empty `Vec` (no allocation) when nothing is due.
    pub fn pop_up_to(&mut self, limit: SimTime) -> Vec<Message<P>> {
        let mut batch = Vec::new();
        while let Some(message) = self.pop_next_up_to(limit) {
            batch.push(message);
        }
        batch
    }

    /// Apply envelopes staged in an [`Inbox`][crate::Inbox]: every delivery
    /// first, then every cancellation.
    ///
    /// Applying deliveries first means a message scheduled and cancelled in
    /// the same round never reaches its target.  Returns the number of
    /// cancellations that actually removed a message.
    pub fn merge(&mut self, envelopes: Vec<Envelope<P>>) -> usize {
        let mut cancels = Vec::new();
        for envelope in envelopes {
            match envelope {
                Envelope::Deliver(message) => self.put(message),
                Envelope::Cancel(handle)   => cancels.push(handle),
            }
        }
        cancels.iter().filter(|handle| self.remove(handle)).count()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
