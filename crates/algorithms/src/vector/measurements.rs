//! Geometric measurements: area and length
//!
//! Planar only. Project to a metric CRS first to get square metres and
//! metres.

use geo::{Area, Euclidean, Geometry, Length};

/// Unsigned planar area of a geometry in CRS units squared.
///
/// Points and lines have no area. Collections sum their members.
pub fn area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => p.unsigned_area(),
        Geometry::MultiPolygon(mp) => mp.unsigned_area(),
        Geometry::Rect(r) => r.unsigned_area(),
        Geometry::Triangle(t) => t.unsigned_area(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(area).sum(),
        _ => 0.0,
    }
}

/// Euclidean length of the linear parts of a geometry in CRS units.
pub fn length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Line(l) => Euclidean.length(l),
        Geometry::LineString(ls) => Euclidean.length(ls),
        Geometry::MultiLineString(mls) => Euclidean.length(mls),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(length).sum(),
        _ => 0.0,
    }
}
