//! Read-only queries over a sealed [`Database`].
//!
//! All methods are pure reads; an [`Annotator`] can be shared freely across
//! threads once the database is sealed.  "No match" is reported per element
//! through the id sentinels ([`NodeId::INVALID`], [`WayId::INVALID`]) —
//! errors are reserved for misuse (out-of-range indexes, missing spatial
//! index).

use waymark_core::{ExternalNodeId, ExternalWayId, GeoPoint, NodeId, WayId};

use crate::database::Database;
use crate::MapResult;

/// Maximum haversine distance, in metres, between a query coordinate and
/// the nearest indexed node for the lookup to count as a match.
pub const SNAP_RADIUS_M: f64 = 5.0;

/// Query surface borrowing the database it reads.
pub struct Annotator<'db> {
    db: &'db Database,
}

impl<'db> Annotator<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Map each coordinate to the internal id of the nearest indexed node,
    /// or [`NodeId::INVALID`] when the nearest node is [`SNAP_RADIUS_M`]
    /// or more away.  The result has the same length as the input.
    ///
    /// # Errors
    ///
    /// [`MapError`](crate::MapError)`::RtreeNotBuilt` if the database was
    /// built without geometry or is not yet sealed.
    pub fn coordinates_to_internal(&self, points: &[GeoPoint]) -> MapResult<Vec<NodeId>> {
        points
            .iter()
            .map(|&p| {
                let hit = self.db.nearest_node(p)?;
                Ok(match hit {
                    Some((q, id)) if p.distance_m(q) < SNAP_RADIUS_M => id,
                    _ => NodeId::INVALID,
                })
            })
            .collect()
    }

    /// Translate external node ids to internal ones, [`NodeId::INVALID`]
    /// for ids the extractor never saw on a retained way.
    pub fn external_to_internal(&self, external: &[ExternalNodeId]) -> Vec<NodeId> {
        external
            .iter()
            .map(|&id| self.db.internal_node_id(id).unwrap_or(NodeId::INVALID))
            .collect()
    }

    /// For a traversed node sequence, the way owning each consecutive
    /// segment: result `[i]` covers `route[i] -> route[i + 1]`, so the
    /// result length is `route.len() - 1` ([`WayId::INVALID`] for segments
    /// no retained way covers).  Routes shorter than two nodes produce an
    /// empty result.
    pub fn annotate_route(&self, route: &[NodeId]) -> Vec<WayId> {
        route
            .windows(2)
            .map(|pair| {
                self.db
                    .segment_way(pair[0], pair[1])
                    .unwrap_or(WayId::INVALID)
            })
            .collect()
    }

    /// Half-open `[first, last)` window of a way's tags in the tag log.
    pub fn tag_range(&self, way: WayId) -> MapResult<(u32, u32)> {
        self.db.tag_range(way)
    }

    /// Key of the tag-log entry at `index`.
    pub fn tag_key(&self, index: u32) -> MapResult<&'db [u8]> {
        self.db.tag_key(index)
    }

    /// Value of the tag-log entry at `index`.
    pub fn tag_value(&self, index: u32) -> MapResult<&'db [u8]> {
        self.db.tag_value(index)
    }

    /// The source-data id of a way.
    pub fn external_way_id(&self, way: WayId) -> MapResult<ExternalWayId> {
        self.db.external_way_id(way)
    }
}
