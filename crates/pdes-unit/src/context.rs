//! Per-call scheduling handle given to a unit.

use std::fmt;

use pdes_core::{MessageId, SimTime, UnitId};
use pdes_queue::{Message, MessageRef, Postbox};

use crate::{UnitError, UnitResult};

/// Everything a unit may do to the outside world during one call.
///
/// Built by the owning worker around each `initialize` / `process` call and
/// dropped right after.  The first scheduling error is also kept inside the
/// context: a unit that swallows the `Err` from [`schedule`](Self::schedule)
/// still fails the run.
pub struct Context<'a, P> {
    unit:      UnitId,
    now:       SimTime,
    horizon:   SimTime,
    round:     u64,
    postbox:   &'a Postbox<P>,
    next_seq:  &'a mut u64,
    produced:  u64,
    cancelled: u64,
    fault:     Option<UnitError>,
}

impl<'a, P: fmt::Debug> Context<'a, P> {
    /// - `now`: time of the message being processed (start time during
    ///   `initialize`).
    /// - `horizon`: earliest time a produced message may carry.
    /// - `round`: the round the call runs in; 0 during setup.
    /// - `next_seq`: the calling unit's private message counter.
    pub fn new(
        unit:     UnitId,
        now:      SimTime,
        horizon:  SimTime,
        round:    u64,
        postbox:  &'a Postbox<P>,
        next_seq: &'a mut u64,
    ) -> Self {
        Self {
            unit,
            now,
            horizon,
            round,
            postbox,
            next_seq,
            produced:  0,
            cancelled: 0,
            fault:     None,
        }
    }

    /// The unit this context belongs to.
    #[inline]
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Time of the message being processed.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Earliest legal time for a new message.
    #[inline]
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    #[inline]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Schedule `payload` for `target` at `time`.
    ///
    /// Fails with [`UnitError::Causality`] if `time` is before the current
    /// horizon.  Messages produced during a round become visible to their
    /// target at the start of the next round.
    pub fn schedule(
        &mut self,
        target:  UnitId,
        time:    SimTime,
        payload: P,
    ) -> UnitResult<MessageRef> {
        let result = self.try_schedule(target, time, payload);
        if let Err(e) = &result {
            self.record(e.clone());
        }
        result
    }

    /// Schedule a message to the calling unit itself.
    pub fn schedule_self(&mut self, time: SimTime, payload: P) -> UnitResult<MessageRef> {
        self.schedule(self.unit, time, payload)
    }

    /// Withdraw a previously scheduled message.
    ///
    /// Best effort: if the target already received it, nothing happens.
    /// Cancelling twice is harmless.
    pub fn unschedule(&mut self, handle: &MessageRef) -> UnitResult<()> {
        match self.postbox.cancel(self.round, *handle) {
            Ok(()) => {
                self.cancelled += 1;
                Ok(())
            }
            Err(e) => {
                let e = UnitError::from(e);
                self.record(e.clone());
                Err(e)
            }
        }
    }

    /// Messages scheduled through this context.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Cancellations posted through this context.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// The first scheduling error raised through this context, if any.
    pub fn take_fault(&mut self) -> Option<UnitError> {
        self.fault.take()
    }

    fn try_schedule(
        &mut self,
        target:  UnitId,
        time:    SimTime,
        payload: P,
    ) -> UnitResult<MessageRef> {
        if !time.is_finite() {
            return Err(UnitError::InvalidTime(time.0));
        }
        if time < self.horizon {
            return Err(UnitError::Causality {
                origin:  self.unit,
                target,
                time,
                horizon: self.horizon,
                payload: format!("{payload:?}"),
            });
        }

        let id = MessageId::new(self.unit, *self.next_seq);
        let message = Message::new(id, target, time, payload);
        let handle = message.handle();
        self.postbox.post(self.round, message)?;

        *self.next_seq += 1;
        self.produced += 1;
        Ok(handle)
    }

    fn record(&mut self, e: UnitError) {
        // Keep only the first error.
        if self.fault.is_none() {
            self.fault = Some(e);
        }
    }
}
