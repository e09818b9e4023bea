//! `waymark-map` — columnar road-network database and annotation queries.
//!
//! Ingests a stream of node/way records, keeps the ways that look like
//! roads (or match caller-supplied rules), and builds a compact,
//! pointer-free index: interned tag strings, a flat tag log with per-way
//! windows, a node-pair → way map, an external → internal node id map, and
//! an R-tree over node positions.  Once sealed the database answers
//! route-annotation queries from any number of threads.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`stringtable`] | `StringTable` — interned byte strings                 |
//! | [`database`]    | `Database` — the columnar store + spatial index       |
//! | [`filter`]      | `WayFilter`, `TagRule` — retention and capture rules  |
//! | [`extractor`]   | `Extractor`, `MapElement` — stream ingestion          |
//! | [`annotator`]   | `Annotator` — read-only query surface                 |
//! | [`osm`]         | `load_from_pbf` (feature = `"osm"` only)              |
//! | [`error`]       | `MapError`, `MapResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on the core id types.     |

pub mod annotator;
pub mod database;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod stringtable;

#[cfg(feature = "osm")]
pub mod osm;


pub use annotator::{Annotator, SNAP_RADIUS_M};
pub use database::Database;
pub use error::{MapError, MapResult};
pub use extractor::{Extractor, MapElement};
pub use filter::{TagRule, WayFilter};
pub use stringtable::{MAX_STRING_LEN, StringTable};
