//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use waymark_map::{osm::load_from_pbf, WayFilter};
//!
//! let db = load_from_pbf(Path::new("berlin.osm.pbf"), WayFilter::Roads, true)?;
//! ```
//!
//! The PBF reader delivers elements in file order; the extractor buffers
//! node locations itself, so a single sequential pass is enough even when
//! ways precede the nodes they reference.

use std::path::Path;

use osmpbf::{Element, ElementReader};

use waymark_core::GeoPoint;

use crate::database::Database;
use crate::extractor::{Extractor, MapElement};
use crate::filter::WayFilter;
use crate::{MapError, MapResult};

/// Build a sealed [`Database`] from an OSM PBF file.
///
/// # Errors
///
/// [`MapError::Osm`] on parse errors, [`MapError::Io`] on file errors,
/// plus anything [`Extractor::finish`] can raise.
pub fn load_from_pbf(
    path: &Path,
    filter: WayFilter,
    retain_geometry: bool,
) -> MapResult<Database> {
    let reader = ElementReader::from_path(path).map_err(osm_error)?;
    let mut extractor = Extractor::new(filter, retain_geometry);

    reader
        .for_each(|element| match element {
            Element::Node(n) => extractor.handle(MapElement::Node {
                id: n.id() as u64,
                point: GeoPoint::new(n.lon(), n.lat()),
            }),
            Element::DenseNode(n) => extractor.handle(MapElement::Node {
                id: n.id() as u64,
                point: GeoPoint::new(n.lon(), n.lat()),
            }),
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(String, String)> = w
                    .tags()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                extractor.handle(MapElement::Way {
                    id: w.id() as u64,
                    nodes: w.refs().map(|r| r as u64).collect(),
                    tags,
                });
            }
            Element::Relation(_) => {}
        })
        .map_err(osm_error)?;

    extractor.finish()
}

fn osm_error(e: osmpbf::Error) -> MapError {
    MapError::Osm(e.to_string())
}
