//! Distance zones around a coastline
//!
//! - Builder: outer buffer minus inner buffer for each band
//! - Assembler: band-ordered zones, one per connected polygon
//! - Pipeline: reprojection, merge, build, clip and assembly in one call

mod assembler;
mod builder;
mod pipeline;

pub use assembler::{assemble, ClippedBand};
pub use builder::{build_band, build_bands, BandGeometry};
pub use pipeline::{build_zone_collection, derive_zones, CoastalZones, ZoneParams};
