//! Speed lookup keyed by way id.
//!
//! # CSV format
//!
//! One record per line, no header:
//!
//! ```csv
//! 62444552,Telegraph Ave,mph,19
//! 11750872,,kph,50
//! 15591960,Broadway,,30
//! ```
//!
//! `way,name,unit,speed` — the name is free text and ignored, the unit is
//! `mph`, `kph`, or empty (empty means kph).  `mph` speeds are converted
//! to kph as `round(speed × 1.609)`.  Rows whose converted speed reaches
//! [`INVALID_SPEED`] are logged and skipped; rows violating the grammar
//! fail the whole load and leave the map untouched.

use std::path::Path;

use rustc_hash::FxHashMap;

use waymark_core::{ExternalWayId, INVALID_SPEED, Speed};

use crate::csv::{MalformedRow, field_u32, field_u64, parse_file};
use crate::{SpeedError, SpeedResult};

/// km per mile, as the conversion has always rounded it.
const KPH_PER_MPH: f64 = 1.609;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SpeedUnit {
    Kph,
    Mph,
}

fn parse_unit(bytes: &[u8]) -> Result<SpeedUnit, MalformedRow> {
    match bytes {
        b"mph" => Ok(SpeedUnit::Mph),
        b"kph" | b"" => Ok(SpeedUnit::Kph),
        _ => Err(MalformedRow),
    }
}

/// Way → speed table.
#[derive(Debug, Default)]
pub struct WaySpeedMap {
    speeds: FxHashMap<ExternalWayId, Speed>,
}

impl WaySpeedMap {
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
        let mut staged: Vec<(ExternalWayId, Speed)> = Vec::new();
        let mut rejected = 0usize;
        parse_file(path, |record| {
            if record.len() < 4 {
                return Err(MalformedRow);
            }
            let way = field_u64(record, 0)?;
            // Field 1 is the way name — free text, unused.
            let unit = parse_unit(record.get(2).ok_or(MalformedRow)?)?;
            let raw = field_u32(record, 3)?;

            let kph = match unit {
                SpeedUnit::Mph => (f64::from(raw) * KPH_PER_MPH).round() as u32,
                SpeedUnit::Kph => raw,
            };
            if kph >= u32::from(INVALID_SPEED) {
                tracing::warn!(way, speed = kph, "speed over limit, row skipped");
                rejected += 1;
                return Ok(());
            }
            staged.push((way, kph as Speed));
            Ok(())
        })?;

        tracing::info!(
            path = %path.display(),
            rows = staged.len(),
            rejected,
            "way speeds loaded"
        );
        self.speeds.extend(staged);
        Ok(())
    }

    /// Insert or overwrite one way speed (already in kph).
    pub fn add(&mut self, way: ExternalWayId, speed: Speed) {
        debug_assert!(speed < INVALID_SPEED);
        self.speeds.insert(way, speed);
    }

    /// Whether the way has an entry.
    pub fn has(&self, way: ExternalWayId) -> bool {
        self.speeds.contains_key(&way)
    }

    /// Speed of the way, in kph.
    ///
    /// # Errors
    ///
    /// [`SpeedError::WayNotFound`] when absent ([`has`](Self::has) is the
    /// non-raising alternative).
    pub fn get(&self, way: ExternalWayId) -> SpeedResult<Speed> {
        self.speeds
            .get(&way)
            .copied()
            .ok_or(SpeedError::WayNotFound(way))
    }

    /// Speeds for each way of a sequence, [`INVALID_SPEED`] for ways
    /// without an entry.  The result has the same length as the input.
    ///
    /// # Errors
    ///
    /// [`SpeedError::TooShort`] for an empty input.
    pub fn get_many(&self, ways: &[ExternalWayId]) -> SpeedResult<Vec<Speed>> {
        if ways.is_empty() {
            return Err(SpeedError::TooShort { need: 1, got: 0 });
        }
        Ok(ways
            .iter()
            .map(|way| self.speeds.get(way).copied().unwrap_or(INVALID_SPEED))
            .collect())
    }

    /// Number of stored ways.
    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }
}
