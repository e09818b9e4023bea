//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two id families exist side by side.  *External* ids are whatever the
//! source map data uses — 64-bit, sparse, never used as an index — so they
//! stay plain integer aliases.  *Internal* ids are dense 32-bit values
//! assigned at build time; they index the columnar tables directly, so each
//! gets a newtype with an `INVALID` sentinel (`u32::MAX`, which is why the
//! usable range stops one short of it).

use std::fmt;

/// A node id as assigned by the upstream map data source.
pub type ExternalNodeId = u64;

/// A way id as assigned by the upstream map data source.
pub type ExternalWayId = u64;

/// A congestion speed in km/h.  `INVALID_SPEED` is reserved to mean
/// "no entry"; valid speeds are `0..INVALID_SPEED`.
pub type Speed = u8;

/// Sentinel speed returned for segments/ways with no loaded entry.
pub const INVALID_SPEED: Speed = Speed::MAX;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
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
    /// Dense internal node id, assigned in the order nodes are first
    /// referenced by a retained way.
    pub struct NodeId(u32);
}

typed_id! {
    /// Dense internal way id, assigned in the order retained ways are seen.
    pub struct WayId(u32);
}

typed_id! {
    /// Id of an interned string in the string pool.
    pub struct StringId(u32);
}
