//! Interning pool for tag strings.
//!
//! Every distinct tag key and value is stored once in a flat byte buffer;
//! the rest of the database refers to strings by [`StringId`].  Entries are
//! clamped to [`MAX_STRING_LEN`] bytes on insert — the clamped slice is
//! what is stored, compared, and returned.
//!
//! While the database is being built, a hash index gives amortized O(1)
//! dedup.  [`StringTable::seal`] drops that index; after sealing the pool
//! is read-only and the only remaining storage is the byte buffer plus one
//! `(start, len)` pair per entry.

use rustc_hash::FxHashMap;

use waymark_core::StringId;

use crate::{MapError, MapResult};

/// Longest stored string, in bytes.  Longer inputs are truncated.
pub const MAX_STRING_LEN: usize = 255;

#[derive(Debug)]
pub struct StringTable {
    /// All string bytes, back to back.
    data: Vec<u8>,
    /// `(start, len)` into `data`, indexed by `StringId`.
    offsets: Vec<(u32, u32)>,
    /// Build-phase dedup index, keyed by the clamped slice.
    /// `None` once the table is sealed.
    index: Option<FxHashMap<Box<[u8]>, StringId>>,
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offsets: Vec::new(),
            index: Some(FxHashMap::default()),
        }
    }

    /// Intern a byte string and return its id.
    ///
    /// Inputs longer than [`MAX_STRING_LEN`] are clamped first; a repeated
    /// `add` of equal (clamped) bytes returns the existing id.
    ///
    /// # Errors
    ///
    /// [`MapError::Sealed`] after [`seal`](Self::seal);
    /// [`MapError::PoolFull`] if the entry count or the byte buffer would
    /// leave the 32-bit range (`StringId` reserves `u32::MAX` as sentinel).
    pub fn add(&mut self, bytes: &[u8]) -> MapResult<StringId> {
        let index = self.index.as_mut().ok_or(MapError::Sealed)?;

        let clamped = &bytes[..bytes.len().min(MAX_STRING_LEN)];
        if let Some(&id) = index.get(clamped) {
            return Ok(id);
        }

        if self.offsets.len() >= StringId::INVALID.index() {
            return Err(MapError::PoolFull);
        }
        let start = self.data.len();
        if start + clamped.len() > u32::MAX as usize {
            return Err(MapError::PoolFull);
        }

        let id = StringId(self.offsets.len() as u32);
        self.data.extend_from_slice(clamped);
        self.offsets.push((start as u32, clamped.len() as u32));
        index.insert(clamped.into(), id);
        Ok(id)
    }

    /// Look up a previously interned string.
    ///
    /// # Errors
    ///
    /// [`MapError::OutOfRange`] if `id` was never assigned.
    pub fn get(&self, id: StringId) -> MapResult<&[u8]> {
        let (start, len) = *self.offsets.get(id.index()).ok_or(MapError::OutOfRange {
            index: id.index(),
            len: self.offsets.len(),
        })?;
        Ok(&self.data[start as usize..(start + len) as usize])
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Drop the dedup index and release slack capacity.  The table is
    /// read-only afterwards.
    pub fn seal(&mut self) {
        self.index = None;
        self.data.shrink_to_fit();
        self.offsets.shrink_to_fit();
    }

    pub fn is_sealed(&self) -> bool {
        self.index.is_none()
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}
