//! Speed lookup keyed by directed segment (ordered external node pair).
//!
//! # CSV format
//!
//! One record per line, no header, LF- or CRLF-terminated:
//!
//! ```csv
//! 86909055,86909053,81
//! 86909053,86909050,81
//! ```
//!
//! `from,to,speed` — extra trailing fields are tolerated and ignored,
//! whitespace inside a record is not.  Speeds must be below
//! [`INVALID_SPEED`]; rows violating the grammar fail the whole load and
//! leave the map untouched.

use std::path::Path;

use rustc_hash::FxHashMap;

use waymark_core::{ExternalNodeId, INVALID_SPEED, Speed};

use crate::csv::{MalformedRow, field_u32, field_u64, parse_file};
use crate::{SpeedError, SpeedResult};

/// Directed-segment → speed table.  Directions are distinct entries:
/// `(a, b)` and `(b, a)` are unrelated keys.
#[derive(Debug, Default)]
pub struct SegmentSpeedMap {
    speeds: FxHashMap<(ExternalNodeId, ExternalNodeId), Speed>,
}

impl SegmentSpeedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a single CSV file.
    pub fn from_csv(path: &Path) -> SpeedResult<Self> {
        let mut map = Self::new();
        map.load_csv(path)?;
        Ok(map)
    }

    /// Build a map from several CSV files, loaded in order.
    pub fn from_csv_files<P: AsRef<Path>>(paths: &[P]) -> SpeedResult<Self> {
        let mut map = Self::new();
        for path in paths {
            map.load_csv(path.as_ref())?;
        }
        Ok(map)
    }

    /// Merge another CSV file into the map.  Later entries overwrite
    /// earlier ones key by key.  On a parse error nothing is merged.
    pub fn load_csv(&mut self, path: &Path) -> SpeedResult<()> {
        let mut staged: Vec<((ExternalNodeId, ExternalNodeId), Speed)> = Vec::new();
        parse_file(path, |record| {
            if record.len() < 3 {
                return Err(MalformedRow);
            }
            let from = field_u64(record, 0)?;
            let to = field_u64(record, 1)?;
            let speed = field_u32(record, 2)?;
            if speed >= u32::from(INVALID_SPEED) {
                return Err(MalformedRow);
            }
            staged.push(((from, to), speed as Speed));
            Ok(())
        })?;

        tracing::info!(path = %path.display(), rows = staged.len(), "segment speeds loaded");
        self.speeds.extend(staged);
        Ok(())
    }

    /// Insert or overwrite one segment speed.
    pub fn add(&mut self, from: ExternalNodeId, to: ExternalNodeId, speed: Speed) {
        debug_assert!(speed < INVALID_SPEED);
        self.speeds.insert((from, to), speed);
    }

    /// Whether the directed segment has an entry.
    pub fn has(&self, from: ExternalNodeId, to: ExternalNodeId) -> bool {
        self.speeds.contains_key(&(from, to))
    }

    /// Speed of the directed segment.
    ///
    /// # Errors
    ///
    /// [`SpeedError::SegmentNotFound`] when absent ([`has`](Self::has) is
    /// the non-raising alternative).
    pub fn get(&self, from: ExternalNodeId, to: ExternalNodeId) -> SpeedResult<Speed> {
        self.speeds
            .get(&(from, to))
            .copied()
            .ok_or(SpeedError::SegmentNotFound { from, to })
    }

    /// Speeds for each consecutive pair of a node sequence: result `[i]`
    /// covers `route[i] -> route[i + 1]`, [`INVALID_SPEED`] for pairs
    /// without an entry.
    ///
    /// # Errors
    ///
    /// [`SpeedError::TooShort`] for routes of fewer than two ids.
    pub fn get_many(&self, route: &[ExternalNodeId]) -> SpeedResult<Vec<Speed>> {
        if route.len() < 2 {
            return Err(SpeedError::TooShort { need: 2, got: route.len() });
        }
        Ok(route
            .windows(2)
            .map(|pair| {
                self.speeds
                    .get(&(pair[0], pair[1]))
                    .copied()
                    .unwrap_or(INVALID_SPEED)
            })
            .collect())
    }

    /// Number of stored segments.
    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }
}
