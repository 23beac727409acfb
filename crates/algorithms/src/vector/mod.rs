//! Vector operations behind zone construction
//!
//! - Validate: reject geometry the overlay cannot repair
//! - Merge: dissolve coastline features into a reference curve
//! - Buffer: polygonal Minkowski sum with a disc
//! - Clip: intersect zones with a region boundary
//! - Bounding box / Area / Length: envelopes and measurements

mod buffer;
mod clip;
mod measurements;
mod merge;
mod spatial;
mod validate;

pub use buffer::{
    buffer_geometry, buffer_line_string, buffer_point, buffer_polygon, buffer_segment,
    BufferParams, DEFAULT_QUADRANT_SEGMENTS,
};
pub use clip::clip_zone;
pub use measurements::{area, length};
pub use merge::{merge_features, merge_geometries, ReferenceCurve};
pub use spatial::{bounding_box, BoundingBox};
pub use validate::validate_geometry;
