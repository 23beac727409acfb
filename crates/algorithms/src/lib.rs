//! # Corrozone Algorithms
//!
//! Geometry for coastal corrosion zoning.
//!
//! ## Modules
//!
//! - **vector**: Validation, merge, buffer, clip and measurements
//! - **zones**: Band building, assembly and the end-to-end pipeline

mod maybe_rayon;

pub mod vector;
pub mod zones;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::vector::{
        area, bounding_box, buffer_geometry, clip_zone, merge_features, merge_geometries,
        BoundingBox, BufferParams, ReferenceCurve,
    };
    pub use crate::zones::{
        assemble, build_band, build_zone_collection, derive_zones, BandGeometry, ClippedBand,
        CoastalZones, ZoneParams,
    };
    pub use corrozone_core::prelude::*;
}
