//! The columnar in-memory database.
//!
//! # Data layout
//!
//! Everything is flat arrays plus two integer-keyed hash maps — no nested
//! ownership, no pointers:
//!
//! ```text
//! strings           interned tag keys/values        (StringTable)
//! key_value_pairs   [(StringId, StringId)]          flat append-only tag log
//! way_tag_ranges    [(first, last)]                 half-open windows into the
//!                                                   tag log, indexed by WayId
//! way_external_ids  [ExternalWayId]                 parallel to way_tag_ranges
//! pair_way_map      {(lo, hi) -> SegmentWays}       canonical node pair -> way
//! external_internal {ExternalNodeId -> NodeId}
//! used_nodes_list   [(GeoPoint, NodeId)]            build phase only
//! rtree             RTree<IndexedPoint>             present after a geometry seal
//! ```
//!
//! # Lifecycle
//!
//! A fresh database accepts writes.  [`Database::compact`] seals it: the
//! R-tree is bulk-loaded from `used_nodes_list` (when geometry is on), the
//! transient structures are dropped, and storage is shrunk.  A sealed
//! database rejects all mutation and is safe to share across threads.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use waymark_core::{ExternalNodeId, ExternalWayId, GeoPoint, NodeId, StringId, WayId};

use crate::stringtable::StringTable;
use crate::{MapError, MapResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a `[lon, lat]` point in degrees with
/// the associated internal node id.
#[derive(Clone, Debug)]
pub(crate) struct IndexedPoint {
    pub point: [f64; 2],
    pub id: NodeId,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    /// Squared euclidean distance in degree space.  Candidate selection
    /// only — the caller applies the real (haversine) distance gate.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lon = self.point[0] - point[0];
        let d_lat = self.point[1] - point[1];
        d_lon * d_lon + d_lat * d_lat
    }
}

// ── Segment records ───────────────────────────────────────────────────────────

/// Value of the pair→way map: one way slot per traversal direction of the
/// canonical `(lo, hi)` node pair.  `WayId::INVALID` marks an unclaimed
/// direction.  Keeping a slot per direction preserves the case of two
/// opposing one-way ways covering the same node pair.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SegmentWays {
    /// Way claiming traversal `lo -> hi`.
    pub lo_hi: WayId,
    /// Way claiming traversal `hi -> lo`.
    pub hi_lo: WayId,
}

impl SegmentWays {
    const EMPTY: SegmentWays = SegmentWays {
        lo_hi: WayId::INVALID,
        hi_lo: WayId::INVALID,
    };
}

/// Canonical key ordering: smaller id first.  Self-loops keep `lo == hi`
/// and use the `lo_hi` slot.
#[inline]
fn canonical(a: NodeId, b: NodeId) -> ((NodeId, NodeId), bool) {
    if a.0 <= b.0 {
        ((a, b), true)
    } else {
        ((b, a), false)
    }
}

// ── Database ──────────────────────────────────────────────────────────────────

pub struct Database {
    strings: StringTable,
    key_value_pairs: Vec<(StringId, StringId)>,
    way_tag_ranges: Vec<(u32, u32)>,
    way_external_ids: Vec<ExternalWayId>,
    pair_way_map: FxHashMap<(NodeId, NodeId), SegmentWays>,
    external_internal_map: FxHashMap<ExternalNodeId, NodeId>,
    used_nodes_list: Vec<(GeoPoint, NodeId)>,
    rtree: Option<RTree<IndexedPoint>>,
    retain_geometry: bool,
    sealed: bool,
}

impl Database {
    /// Create an empty, writable database.
    ///
    /// With `retain_geometry`, node points are collected during the build
    /// and a spatial index is constructed at seal time; without it,
    /// coordinate queries fail [`MapError::RtreeNotBuilt`] forever.
    pub fn new(retain_geometry: bool) -> Self {
        Self {
            strings: StringTable::new(),
            key_value_pairs: Vec::new(),
            way_tag_ranges: Vec::new(),
            way_external_ids: Vec::new(),
            pair_way_map: FxHashMap::default(),
            external_internal_map: FxHashMap::default(),
            used_nodes_list: Vec::new(),
            rtree: None,
            retain_geometry,
            sealed: false,
        }
    }

    fn check_writable(&self) -> MapResult<()> {
        if self.sealed { Err(MapError::Sealed) } else { Ok(()) }
    }

    // ── Build-phase mutators ──────────────────────────────────────────────

    /// Intern a string.  See [`StringTable::add`].
    pub fn add_string(&mut self, bytes: &[u8]) -> MapResult<StringId> {
        self.check_writable()?;
        self.strings.add(bytes)
    }

    /// Append one `(key, value)` pair to the flat tag log.
    pub fn push_tag_pair(&mut self, key: StringId, value: StringId) -> MapResult<()> {
        self.check_writable()?;
        if self.key_value_pairs.len() >= u32::MAX as usize {
            return Err(MapError::TableFull { table: "key_value_pairs" });
        }
        self.key_value_pairs.push((key, value));
        Ok(())
    }

    /// Register a way whose tags occupy the half-open log range
    /// `[first, last)` and return its freshly assigned internal id.
    pub fn push_way(
        &mut self,
        first: u32,
        last: u32,
        external_id: ExternalWayId,
    ) -> MapResult<WayId> {
        self.check_writable()?;
        debug_assert!(first <= last && last as usize <= self.key_value_pairs.len());
        if self.way_tag_ranges.len() >= WayId::INVALID.index() {
            return Err(MapError::TableFull { table: "way_tag_ranges" });
        }
        let id = WayId(self.way_tag_ranges.len() as u32);
        self.way_tag_ranges.push((first, last));
        self.way_external_ids.push(external_id);
        Ok(id)
    }

    /// Translate an external node id to an internal one, assigning the
    /// next sequential id on first sight.  When geometry is retained the
    /// point is recorded for the seal-time R-tree build.
    pub fn node_for_external(
        &mut self,
        external: ExternalNodeId,
        point: GeoPoint,
    ) -> MapResult<NodeId> {
        self.check_writable()?;
        if let Some(&id) = self.external_internal_map.get(&external) {
            return Ok(id);
        }
        if self.external_internal_map.len() >= NodeId::INVALID.index() {
            return Err(MapError::TableFull { table: "external_internal_map" });
        }
        let id = NodeId(self.external_internal_map.len() as u32);
        self.external_internal_map.insert(external, id);
        if self.retain_geometry {
            self.used_nodes_list.push((point, id));
        }
        Ok(id)
    }

    /// Record that the directed segment `from -> to` belongs to `way`.
    /// First writer per direction wins; later claims are ignored.
    pub fn insert_segment(&mut self, from: NodeId, to: NodeId, way: WayId) -> MapResult<()> {
        self.check_writable()?;
        let (key, is_lo_hi) = canonical(from, to);
        let entry = self.pair_way_map.entry(key).or_insert(SegmentWays::EMPTY);
        let slot = if is_lo_hi { &mut entry.lo_hi } else { &mut entry.hi_lo };
        if *slot == WayId::INVALID {
            *slot = way;
        }
        Ok(())
    }

    /// Seal the database.
    ///
    /// Bulk-builds the spatial index from the collected node points (iff
    /// the build retains geometry), drops the build-phase structures, and
    /// releases slack capacity.  After this the database is read-only.
    ///
    /// # Errors
    ///
    /// [`MapError::AlreadySealed`] on a second call.
    pub fn compact(&mut self) -> MapResult<()> {
        if self.sealed {
            return Err(MapError::AlreadySealed);
        }

        if self.retain_geometry {
            let entries: Vec<IndexedPoint> = self
                .used_nodes_list
                .iter()
                .map(|&(p, id)| IndexedPoint { point: [p.lon, p.lat], id })
                .collect();
            self.rtree = Some(RTree::bulk_load(entries));
        }

        self.used_nodes_list = Vec::new();
        self.strings.seal();
        self.key_value_pairs.shrink_to_fit();
        self.way_tag_ranges.shrink_to_fit();
        self.way_external_ids.shrink_to_fit();
        self.pair_way_map.shrink_to_fit();
        self.external_internal_map.shrink_to_fit();
        self.sealed = true;

        tracing::info!(
            node_pairs = self.pair_way_map.len(),
            ways = self.way_tag_ranges.len(),
            nodes = self.external_internal_map.len(),
            strings = self.strings.len(),
            tag_pairs = self.key_value_pairs.len(),
            rtree = self.rtree.is_some(),
            "database sealed"
        );
        Ok(())
    }

    // ── Read accessors ────────────────────────────────────────────────────

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Look up a previously interned string.
    pub fn get_string(&self, id: StringId) -> MapResult<&[u8]> {
        self.strings.get(id)
    }

    /// Half-open `[first, last)` tag-log range of a way.
    pub fn tag_range(&self, way: WayId) -> MapResult<(u32, u32)> {
        self.way_tag_ranges
            .get(way.index())
            .copied()
            .ok_or(MapError::OutOfRange {
                index: way.index(),
                len: self.way_tag_ranges.len(),
            })
    }

    /// Key string of the tag-log entry at `index`.
    pub fn tag_key(&self, index: u32) -> MapResult<&[u8]> {
        let &(key, _) = self.tag_pair(index)?;
        self.strings.get(key)
    }

    /// Value string of the tag-log entry at `index`.
    pub fn tag_value(&self, index: u32) -> MapResult<&[u8]> {
        let &(_, value) = self.tag_pair(index)?;
        self.strings.get(value)
    }

    fn tag_pair(&self, index: u32) -> MapResult<&(StringId, StringId)> {
        self.key_value_pairs
            .get(index as usize)
            .ok_or(MapError::OutOfRange {
                index: index as usize,
                len: self.key_value_pairs.len(),
            })
    }

    /// The way id assigned by the upstream data source.
    pub fn external_way_id(&self, way: WayId) -> MapResult<ExternalWayId> {
        self.way_external_ids
            .get(way.index())
            .copied()
            .ok_or(MapError::OutOfRange {
                index: way.index(),
                len: self.way_external_ids.len(),
            })
    }

    /// The internal id for an external node id, if that node was ever
    /// referenced by a retained way.
    pub fn internal_node_id(&self, external: ExternalNodeId) -> Option<NodeId> {
        self.external_internal_map.get(&external).copied()
    }

    /// The way owning the directed segment `from -> to`, if any.
    pub fn segment_way(&self, from: NodeId, to: NodeId) -> Option<WayId> {
        let (key, is_lo_hi) = canonical(from, to);
        let entry = self.pair_way_map.get(&key)?;
        let way = if is_lo_hi { entry.lo_hi } else { entry.hi_lo };
        (way != WayId::INVALID).then_some(way)
    }

    /// Nearest indexed node to `point`, with its position.
    ///
    /// # Errors
    ///
    /// [`MapError::RtreeNotBuilt`] unless the database was sealed with
    /// geometry retained.
    pub fn nearest_node(&self, point: GeoPoint) -> MapResult<Option<(GeoPoint, NodeId)>> {
        let rtree = self.rtree.as_ref().ok_or(MapError::RtreeNotBuilt)?;
        Ok(rtree
            .nearest_neighbor(&[point.lon, point.lat])
            .map(|e| (GeoPoint::new(e.point[0], e.point[1]), e.id)))
    }

    // ── Table sizes ───────────────────────────────────────────────────────

    pub fn way_count(&self) -> usize {
        self.way_tag_ranges.len()
    }

    pub fn tag_pair_count(&self) -> usize {
        self.key_value_pairs.len()
    }

    pub fn node_count(&self) -> usize {
        self.external_internal_map.len()
    }

    pub fn segment_count(&self) -> usize {
        self.pair_way_map.len()
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }
}
