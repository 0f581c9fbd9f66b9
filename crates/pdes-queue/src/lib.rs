//! `pdes-queue` — messages, per-worker queues, and cross-worker routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`message`]  | `Message<P>`, `MessageRef`                                |
//! | [`queue`]    | `MessageQueue<P>` (`BTreeMap<(SimTime, MessageId), _>`)   |
//! | [`inbox`]    | `Inbox<P>`, `Envelope<P>` — staged cross-thread insertion |
//! | [`postbox`]  | `Postbox<P>`, `Route` — unit → worker routing table        |
//! | [`error`]    | `QueueError`, `QueueResult<T>`                            |
//!
//! # Ownership model
//!
//! ```text
//!   producer (any worker) ──post──▶ Inbox[target worker][round % 2]   (mutex)
//!                                          │
//!            start of next round, owner ───┘ merge
//!                                          ▼
//!                                   MessageQueue (owner only, no lock)
//! ```
//!
//! A `MessageQueue` is never shared.  The only cross-thread write path is
//! the target worker's `Inbox`, whose critical section is a `Vec::push`.

pub mod error;
pub mod inbox;
pub mod message;
pub mod postbox;
pub mod queue;

#[cfg(test)]
mod tests;

pub use error::{QueueError, QueueResult};
pub use inbox::{Envelope, Inbox};
pub use message::{Message, MessageRef};
pub use postbox::{Postbox, Route};
pub use queue::MessageQueue;
