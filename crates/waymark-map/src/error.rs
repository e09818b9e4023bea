//! Map-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by `waymark-map`.
///
/// Per-element "no match" results are never errors — queries report those
/// through the `INVALID` id sentinels instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("index {index} out of range (table length {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("database is sealed and no longer accepts writes")]
    Sealed,

    #[error("database has already been sealed")]
    AlreadySealed,

    #[error("spatial index not built (database unsealed, or built without geometry)")]
    RtreeNotBuilt,

    #[error("string pool exhausted its 32-bit id space")]
    PoolFull,

    #[error("{table} table exhausted its 32-bit id space")]
    TableFull { table: &'static str },

    #[error("invalid filter rule at {}:{line}: {text:?}", path.display())]
    FilterRule {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type MapResult<T> = Result<T, MapError>;
