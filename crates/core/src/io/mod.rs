//! I/O collaborators: reading coastline and boundary layers, exporting zones
//!
//! GeoJSON, KML and shapefile codecs come from the `geojson`, `kml` and
//! `shapefile` crates; this module maps them onto CRS-tagged feature
//! collections and zones.

mod export;
mod geojson_io;
mod kml_io;
mod shapefile_io;

pub use export::{export, ExportFormat};
pub use geojson_io::{
    load_boundary, load_features, parse_features, write_feature_collection, zone_features,
};
pub use kml_io::{write_kml, zone_placemarks};
pub use shapefile_io::write_shapefile;
