//! Memory-mapped CSV ingestion shared by the two speed maps.
//!
//! The whole file is mapped once and a headerless, flexible reader streams
//! byte records straight off the mapped region.  Callers get each record
//! through a callback and report unusable rows back; the loader then
//! recovers the 1-based line number (from the record position) and the
//! offending line's text (sliced out of the mapping) for the error.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::{SpeedError, SpeedResult};

/// Marker returned by a record callback for a row that fails its grammar.
pub(crate) struct MalformedRow;

/// Parse `path` record by record.
///
/// The callback may mutate captured state to stage rows; when it returns
/// `Err(MalformedRow)` parsing stops and a [`SpeedError::Parse`] naming
/// the row is returned.  Empty files and blank lines are fine.  The file
/// mapping is dropped on every exit path.
pub(crate) fn parse_file<F>(path: &Path, mut row: F) -> SpeedResult<()>
where
    F: FnMut(&csv::ByteRecord) -> Result<(), MalformedRow>,
{
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(());
    }
    // Safety: the mapping is read-only and private to this call.  Mutating
    // the file while a load is in flight is a caller contract violation,
    // as with any mmap-based reader.
    let mmap = unsafe { Mmap::map(&file)? };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(&mmap[..]);

    for record in reader.byte_records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => return Err(parse_error(path, &mmap, e.position())),
        };
        if row(&record).is_err() {
            return Err(parse_error(path, &mmap, record.position()));
        }
    }
    Ok(())
}

/// Build the diagnostic for a failed row: line number from the record
/// position, line text from the mapped bytes (record start to `\n`).
fn parse_error(path: &Path, data: &[u8], position: Option<&csv::Position>) -> SpeedError {
    let (line, text) = match position {
        Some(pos) => {
            let start = pos.byte() as usize;
            let end = memchr::memchr(b'\n', &data[start..])
                .map_or(data.len(), |i| start + i);
            let mut line_bytes = &data[start..end];
            if line_bytes.last() == Some(&b'\r') {
                line_bytes = &line_bytes[..line_bytes.len() - 1];
            }
            (pos.line(), String::from_utf8_lossy(line_bytes).into_owned())
        }
        None => (0, String::new()),
    };
    SpeedError::Parse {
        path: path.to_path_buf(),
        line,
        text,
    }
}

// ── Field parsers ─────────────────────────────────────────────────────────────
//
// Strict by construction: no whitespace trimming, no sign prefixes beyond
// what `str::parse` accepts for unsigned ints.

pub(crate) fn field_u64(record: &csv::ByteRecord, index: usize) -> Result<u64, MalformedRow> {
    parse_field(record, index)
}

pub(crate) fn field_u32(record: &csv::ByteRecord, index: usize) -> Result<u32, MalformedRow> {
    parse_field(record, index)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::ByteRecord,
    index: usize,
) -> Result<T, MalformedRow> {
    let bytes = record.get(index).ok_or(MalformedRow)?;
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(MalformedRow)
}
