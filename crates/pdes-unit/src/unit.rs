//! The `SimUnit` trait — the main extension point for model code.

use std::fmt;

use pdes_core::SimTime;
use pdes_queue::Message;

use crate::{Context, UnitResult};

/// A network entity that receives and produces messages.
///
/// Each unit is permanently owned by one worker thread.  `initialize` and
/// `process` are only ever called from that thread, so unit state needs no
/// locking; the trait requires `Send` but not `Sync`.
///
/// Simulations with several kinds of unit use an enum that implements
/// `SimUnit` by dispatching to its variants.
///
/// # Example
///
/// ```rust,ignore
/// struct Relay { next: UnitId, delay: f64 }
///
/// impl SimUnit for Relay {
///     type Payload = u32;
///
///     fn lookahead(&self) -> SimTime { SimTime(self.delay) }
///
///     fn process(&mut self, msg: &Message<u32>, ctx: &mut Context<'_, u32>) -> UnitResult<()> {
///         ctx.schedule(self.next, ctx.now() + self.delay, *msg.payload() + 1)?;
///         Ok(())
///     }
/// }
/// ```
pub trait SimUnit: Send + 'static {
    /// What this unit's messages carry.  `Debug` is required so fatal errors
    /// can show the offending payload.
    type Payload: Send + fmt::Debug + 'static;

    /// The minimum delay between a message this unit processes and any
    /// message it produces in response.
    ///
    /// Read once, before the run.  Must be finite and strictly positive.  The
    /// scheduler advances the horizon by the minimum over all units.
    fn lookahead(&self) -> SimTime;

    /// Called once before the first round, in unspecified order across
    /// units (possibly in parallel).  Must not depend on other units having
    /// been initialized.  May schedule the unit's initial messages.
    fn initialize(&mut self, _ctx: &mut Context<'_, Self::Payload>) -> UnitResult<()> {
        Ok(())
    }

    /// Handle one message addressed to this unit.
    ///
    /// Must not block, sleep, or do I/O.  Any error aborts the whole run.
    fn process(
        &mut self,
        message: &Message<Self::Payload>,
        ctx:     &mut Context<'_, Self::Payload>,
    ) -> UnitResult<()>;
}
