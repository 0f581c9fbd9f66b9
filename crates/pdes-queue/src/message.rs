//! The unit of causality.

use std::fmt;

use pdes_core::{MessageId, SimTime, UnitId};

/// An immutable timestamped event addressed to one unit.
///
/// Fields are private: a message is never mutated after creation.
/// Cancellation is a separate removal keyed by [`MessageRef`].
///
/// Equality is by identity ([`MessageId`]) only.  Two messages with the same
/// target, time, and payload are still distinct and can be cancelled
/// individually.
#[derive(Clone)]
pub struct Message<P> {
    id:      MessageId,
    target:  UnitId,
    time:    SimTime,
    payload: P,
}

impl<P> Message<P> {
    /// Build a message.  Time validation (finite, not in the past) is the
    /// producer's job; see `pdes_unit::Context::schedule`.
    pub fn new(id: MessageId, target: UnitId, time: SimTime, payload: P) -> Self {
        Self { id, target, time, payload }
    }

    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[inline]
    pub fn target(&self) -> UnitId {
        self.target
    }

    #[inline]
    pub fn time(&self) -> SimTime {
        self.time
    }

    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    /// The handle used to cancel this message.
    #[inline]
    pub fn handle(&self) -> MessageRef {
        MessageRef { id: self.id, target: self.target, time: self.time }
    }

    /// Queue ordering key.
    #[inline]
    pub(crate) fn key(&self) -> (SimTime, MessageId) {
        (self.time, self.id)
    }
}

impl<P> PartialEq for Message<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for Message<P> {}

impl<P: fmt::Debug> fmt::Debug for Message<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("time", &self.time.0)
            .field("payload", &self.payload)
            .finish()
    }
}

/// A `Copy` handle to a scheduled message: enough to route a cancellation to
/// the right queue and find the entry there in O(log n).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub id:     MessageId,
    pub target: UnitId,
    pub time:   SimTime,
}

impl MessageRef {
    #[inline]
    pub(crate) fn key(&self) -> (SimTime, MessageId) {
        (self.time, self.id)
    }
}
