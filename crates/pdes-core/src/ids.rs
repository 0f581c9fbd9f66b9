//! Strongly typed, zero-cost identifier wrappers.
//!
//! `UnitId` and `WorkerId` are `Copy + Ord + Hash` so they can be used as map
//! keys and sorted collection elements without ceremony.  The inner integer is
//! `pub` to allow direct indexing into arena `Vec`s via `id.0 as usize`, but
//! callers should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID", equal to `<inner>::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a simulation unit in the scheduler's arena.  Dense, assigned
    /// in registration order, immutable for the unit's lifetime.
    pub struct UnitId(u32);
}

typed_id! {
    /// Index of a message-executor worker thread.  `0 .. num_workers`.
    pub struct WorkerId(u16);
}

typed_id! {
    /// Index of a node in a `pdes_network::Network`.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed link in CSR order.  In the traffic model each
    /// link is also one simulation unit.
    pub struct LinkId(u32);
}

typed_id! {
    /// Index of a vehicle in a generated population.
    pub struct VehicleId(u32);
}

impl UnitId {
    /// Origin used for messages scheduled by the harness during setup rather
    /// than by a unit.  Shares the `INVALID` bit pattern: no registered unit
    /// ever carries it.
    pub const SETUP: UnitId = UnitId::INVALID;
}

// ── MessageId ─────────────────────────────────────────────────────────────────

/// Identity of a message.
///
/// `origin` is the unit that produced it (or [`UnitId::SETUP`]); `seq` is a
/// counter private to that origin.  Only the origin's owning worker advances
/// the counter, so ids are unique without any cross-thread coordination and
/// identical inputs always produce identical ids.
///
/// The derived `Ord` (origin first, then seq) is the tie-break applied after
/// message time in every queue.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    pub origin: UnitId,
    pub seq:    u64,
}

impl MessageId {
    #[inline]
    pub fn new(origin: UnitId, seq: u64) -> Self {
        Self { origin, seq }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.origin == UnitId::SETUP {
            write!(f, "setup#{}", self.seq)
        } else {
            write!(f, "{}#{}", self.origin.0, self.seq)
        }
    }
}
