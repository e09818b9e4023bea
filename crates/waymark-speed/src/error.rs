//! Speed-map error type.

use std::path::PathBuf;

use thiserror::Error;

use waymark_core::{ExternalNodeId, ExternalWayId};

/// Errors produced by `waymark-speed`.
#[derive(Debug, Error)]
pub enum SpeedError {
    /// A CSV row did not match the expected grammar.  `line` is 1-based;
    /// `text` is the offending line as it appears in the file.
    #[error("{}:{line}: malformed row: {text:?}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        text: String,
    },

    #[error("no speed entry for segment {from} -> {to}")]
    SegmentNotFound {
        from: ExternalNodeId,
        to: ExternalNodeId,
    },

    #[error("no speed entry for way {0}")]
    WayNotFound(ExternalWayId),

    #[error("route too short: need at least {need} ids, got {got}")]
    TooShort { need: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpeedResult<T> = Result<T, SpeedError>;
