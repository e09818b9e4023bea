//! Builds a [`Database`] from a stream of map elements.
//!
//! # Usage
//!
//! ```
//! use waymark_core::GeoPoint;
//! use waymark_map::{Extractor, MapElement, WayFilter};
//!
//! let mut ex = Extractor::new(WayFilter::Roads, true);
//! ex.handle(MapElement::Node { id: 10, point: GeoPoint::new(0.0, 0.0) });
//! ex.handle(MapElement::Node { id: 11, point: GeoPoint::new(0.001, 0.0) });
//! ex.handle(MapElement::Way {
//!     id: 500,
//!     nodes: vec![10, 11],
//!     tags: vec![("highway".into(), "primary".into())],
//! });
//! let db = ex.finish()?;
//! assert_eq!(db.way_count(), 1);
//! # Ok::<(), waymark_map::MapError>(())
//! ```
//!
//! # Element order
//!
//! Source files interleave nodes and ways in no guaranteed order, so the
//! extractor buffers node locations and retained ways as they arrive and
//! does all database population in [`finish`](Extractor::finish).  By then
//! every node location the stream will ever deliver is known; way segments
//! whose endpoints never got a location are dropped silently.

use rustc_hash::FxHashMap;

use waymark_core::{ExternalNodeId, ExternalWayId, GeoPoint, NodeId, WayId};

use crate::database::Database;
use crate::filter::WayFilter;
use crate::MapResult;

// ── Input elements ────────────────────────────────────────────────────────────

/// One record from the upstream map parser.
#[derive(Clone, Debug)]
pub enum MapElement {
    Node {
        id: ExternalNodeId,
        point: GeoPoint,
    },
    Way {
        id: ExternalWayId,
        /// Node references, in traversal order.
        nodes: Vec<ExternalNodeId>,
        tags: Vec<(String, String)>,
    },
}

// ── Extractor ─────────────────────────────────────────────────────────────────

/// Traversal directions a way contributes segments for.
#[derive(Copy, Clone, Debug)]
struct Directions {
    forward: bool,
    reverse: bool,
}

/// `oneway=yes` keeps only the node order as given; `oneway=-1` keeps only
/// the reversed order; anything else (including `no`) keeps both.
fn directions(tags: &[(String, String)]) -> Directions {
    match tags.iter().find(|(k, _)| k == "oneway").map(|(_, v)| v.as_str()) {
        Some("yes") => Directions { forward: true, reverse: false },
        Some("-1") => Directions { forward: false, reverse: true },
        _ => Directions { forward: true, reverse: true },
    }
}

/// A retained way waiting for [`Extractor::finish`].
struct PendingWay {
    external_id: ExternalWayId,
    nodes: Vec<ExternalNodeId>,
    /// Tags that passed the capture rule, in source order.
    tags: Vec<(String, String)>,
    directions: Directions,
}

pub struct Extractor {
    filter: WayFilter,
    db: Database,
    locations: FxHashMap<ExternalNodeId, GeoPoint>,
    pending: Vec<PendingWay>,
}

impl Extractor {
    pub fn new(filter: WayFilter, retain_geometry: bool) -> Self {
        Self {
            filter,
            db: Database::new(retain_geometry),
            locations: FxHashMap::default(),
            pending: Vec::new(),
        }
    }

    /// Feed one element.  Nodes record a location (last arrival wins);
    /// ways are tested against the filter and buffered if retained.
    pub fn handle(&mut self, element: MapElement) {
        match element {
            MapElement::Node { id, point } => {
                self.locations.insert(id, point);
            }
            MapElement::Way { id, nodes, tags } => {
                // A way needs at least one segment to be worth keeping.
                if nodes.len() < 2 || !self.filter.retains(&tags) {
                    return;
                }
                let directions = directions(&tags);
                let tags = tags
                    .into_iter()
                    .filter(|(k, v)| self.filter.captures(k, v))
                    .collect();
                self.pending.push(PendingWay {
                    external_id: id,
                    nodes,
                    tags,
                    directions,
                });
            }
        }
    }

    /// Drain an element iterator through [`handle`](Self::handle).
    pub fn run<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = MapElement>,
    {
        for element in elements {
            self.handle(element);
        }
    }

    /// Process everything buffered and return the sealed database.
    pub fn finish(mut self) -> MapResult<Database> {
        let ways = std::mem::take(&mut self.pending);
        let mut skipped_segments = 0usize;

        for way in ways {
            self.store_way(way, &mut skipped_segments)?;
        }

        tracing::info!(
            ways = self.db.way_count(),
            node_pairs = self.db.segment_count(),
            skipped_segments,
            "extraction complete"
        );

        let mut db = self.db;
        db.compact()?;
        Ok(db)
    }

    fn store_way(&mut self, way: PendingWay, skipped_segments: &mut usize) -> MapResult<()> {
        // Tag log window for this way, half-open.  The synthetic _way_id
        // tag preserves the source id alongside the real tags.
        let first = self.db.tag_pair_count() as u32;
        for (key, value) in &way.tags {
            let key = self.db.add_string(key.as_bytes())?;
            let value = self.db.add_string(value.as_bytes())?;
            self.db.push_tag_pair(key, value)?;
        }
        let key = self.db.add_string(b"_way_id")?;
        let value = self.db.add_string(way.external_id.to_string().as_bytes())?;
        self.db.push_tag_pair(key, value)?;
        let last = self.db.tag_pair_count() as u32;

        let way_id = self.db.push_way(first, last, way.external_id)?;

        for pair in way.nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(&pa), Some(&pb)) = (self.locations.get(&a), self.locations.get(&b))
            else {
                *skipped_segments += 1;
                continue;
            };
            let ia = self.db.node_for_external(a, pa)?;
            let ib = self.db.node_for_external(b, pb)?;
            self.insert_directed(ia, ib, way_id, way.directions)?;
        }
        Ok(())
    }

    fn insert_directed(
        &mut self,
        a: NodeId,
        b: NodeId,
        way: WayId,
        directions: Directions,
    ) -> MapResult<()> {
        if directions.forward {
            self.db.insert_segment(a, b, way)?;
        }
        if directions.reverse {
            self.db.insert_segment(b, a, way)?;
        }
        Ok(())
    }
}
