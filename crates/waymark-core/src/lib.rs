//! `waymark-core` — foundational types for the waymark road lookup crates.
//!
//! This crate is a dependency of every other `waymark-*` crate.  It has no
//! `waymark-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module  | Contents                                                   |
//! |---------|------------------------------------------------------------|
//! | [`ids`] | `NodeId`, `WayId`, `StringId`, external id aliases, `Speed`|
//! | [`geo`] | `GeoPoint`, haversine distance                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{EARTH_RADIUS_M, GeoPoint};
pub use ids::{
    ExternalNodeId, ExternalWayId, INVALID_SPEED, NodeId, Speed, StringId, WayId,
};
