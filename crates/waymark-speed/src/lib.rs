//! `waymark-speed` — congestion-speed lookup tables.
//!
//! Two independent maps, both bulk-loaded from CSV side-files: one keyed
//! by directed segment (ordered pair of external node ids), one keyed by
//! way id.  Lookups are pure reads; a loaded map is `Send + Sync` and can
//! be shared behind an `Arc`.  To refresh speeds without blocking readers,
//! build a new map off-thread and swap the `Arc` — queries in flight keep
//! the old instance alive until they return.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`segment`] | `SegmentSpeedMap` — `(from, to)` → speed              |
//! | [`way`]     | `WaySpeedMap` — way id → speed, mph→kph conversion    |
//! | `csv`       | shared memory-mapped CSV ingestion (crate-private)    |
//! | [`error`]   | `SpeedError`, `SpeedResult<T>`                        |

pub mod error;
pub mod segment;
pub mod way;

mod csv;

#[cfg(test)]
mod tests;

pub use error::{SpeedError, SpeedResult};
pub use segment::SegmentSpeedMap;
pub use way::WaySpeedMap;
