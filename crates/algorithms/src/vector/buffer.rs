//! Buffer operations
//!
//! Polygonal Minkowski sum of a geometry with a disc. A point becomes a
//! regular polygon, a segment becomes the convex hull of its two end discs
//! (a capsule), and longer shapes are the union of those pieces.
//!
//! Every disc uses the same vertex angles regardless of radius, so the
//! buffer at a smaller distance always lies inside the buffer at a larger
//! one.

use corrozone_core::vector::{repair_polygon, union_polygons};
use geo::{ConvexHull, Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use std::f64::consts::PI;

use crate::maybe_rayon::*;

/// Default number of edges per quarter circle
pub const DEFAULT_QUADRANT_SEGMENTS: usize = 16;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance in CRS units. Non-positive distances add nothing.
    pub distance: f64,
    /// Number of edges used per quarter circle (default: 16)
    pub quadrant_segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

impl BufferParams {
    pub fn new(distance: f64, quadrant_segments: usize) -> Self {
        Self {
            distance,
            quadrant_segments,
        }
    }

    fn vertex_count(&self) -> usize {
        4 * self.quadrant_segments.max(1)
    }

    fn is_positive(&self) -> bool {
        self.distance > 0.0 && self.distance.is_finite()
    }
}

fn disc_coords(center: Coord<f64>, params: &BufferParams) -> Vec<Coord<f64>> {
    let n = params.vertex_count();
    let r = params.distance;
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Coord {
                x: center.x + r * angle.cos(),
                y: center.y + r * angle.sin(),
            }
        })
        .collect()
}

fn disc(center: Coord<f64>, params: &BufferParams) -> Polygon<f64> {
    let mut coords = disc_coords(center, params);
    // Close the ring
    coords.push(coords[0]);
    Polygon::new(LineString::from(coords), vec![])
}

/// Create a circular buffer around a point.
///
/// Returns an empty multipolygon for a non-positive distance.
pub fn buffer_point(point: &Point<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    if !params.is_positive() {
        return MultiPolygon::new(vec![]);
    }
    MultiPolygon::new(vec![disc(point.0, params)])
}

/// Buffer a single segment: the convex hull of the discs at both ends.
pub fn buffer_segment(a: Coord<f64>, b: Coord<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    if !params.is_positive() {
        return MultiPolygon::new(vec![]);
    }
    if a == b {
        return MultiPolygon::new(vec![disc(a, params)]);
    }
    let mut points = disc_coords(a, params);
    points.extend(disc_coords(b, params));
    let hull = MultiPoint::from(points.into_iter().map(Point::from).collect::<Vec<_>>())
        .convex_hull();
    MultiPolygon::new(vec![hull])
}

fn ring_capsules(ring: &LineString<f64>, params: &BufferParams) -> Vec<MultiPolygon<f64>> {
    let mut capsules: Vec<MultiPolygon<f64>> = ring
        .lines()
        .filter(|l| l.start != l.end)
        .map(|l| buffer_segment(l.start, l.end, params))
        .collect();
    // A line string whose vertices all coincide still covers a disc
    if capsules.is_empty() {
        if let Some(c) = ring.0.first() {
            capsules.push(MultiPolygon::new(vec![disc(*c, params)]));
        }
    }
    capsules
}

/// Buffer a line string as the union of its segment capsules.
pub fn buffer_line_string(line: &LineString<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    if !params.is_positive() || line.0.is_empty() {
        return MultiPolygon::new(vec![]);
    }
    union_polygons(ring_capsules(line, params))
}

/// Buffer a polygon: the polygon itself plus the capsules of every ring.
///
/// Self-intersections are resolved with the even-odd rule first. A
/// non-positive distance returns the polygon unchanged.
pub fn buffer_polygon(polygon: &Polygon<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    if !params.is_positive() {
        return MultiPolygon::new(vec![polygon.clone()]);
    }
    let mut parts = vec![repair_polygon(polygon)];
    parts.extend(ring_capsules(polygon.exterior(), params));
    for interior in polygon.interiors() {
        parts.extend(ring_capsules(interior, params));
    }
    union_polygons(parts)
}

/// Buffer any geometry. Multi-part inputs are buffered part by part and
/// dissolved.
pub fn buffer_geometry(geometry: &Geometry<f64>, params: &BufferParams) -> MultiPolygon<f64> {
    match geometry {
        Geometry::Point(p) => buffer_point(p, params),
        Geometry::Line(l) => buffer_segment(l.start, l.end, params),
        Geometry::LineString(ls) => buffer_line_string(ls, params),
        Geometry::Polygon(p) => buffer_polygon(p, params),
        Geometry::MultiPoint(mp) => {
            union_polygons(mp.0.iter().map(|p| buffer_point(p, params)).collect())
        }
        Geometry::MultiLineString(mls) => union_polygons(
            (&mls.0)
                .into_par_iter()
                .map(|ls| buffer_line_string(ls, params))
                .collect(),
        ),
        Geometry::MultiPolygon(mp) => union_polygons(
            (&mp.0)
                .into_par_iter()
                .map(|p| buffer_polygon(p, params))
                .collect(),
        ),
        Geometry::Rect(r) => buffer_polygon(&r.to_polygon(), params),
        Geometry::Triangle(t) => buffer_polygon(&t.to_polygon(), params),
        Geometry::GeometryCollection(gc) => {
            union_polygons(gc.0.iter().map(|g| buffer_geometry(g, params)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, BooleanOps};

    fn polygon_area(n: usize, r: f64) -> f64 {
        0.5 * n as f64 * r * r * (2.0 * PI / n as f64).sin()
    }

    #[test]
    fn test_buffer_point_circle() {
        let point = Point::new(0.0, 0.0);
        let params = BufferParams::new(10.0, 16);

        let buffer = buffer_point(&point, &params);

        // Area should approximate π * r²
        let expected_area = PI * 100.0;
        let actual_area = buffer.unsigned_area();

        let error = (actual_area - expected_area).abs() / expected_area;
        assert!(
            error < 0.01,
            "Circle area error {:.2}% (expected {:.1}, got {:.1})",
            error * 100.0,
            expected_area,
            actual_area
        );
    }

    #[test]
    fn test_buffer_point_vertex_count() {
        let point = Point::new(5.0, 5.0);
        let params = BufferParams::new(1.0, 8);

        let buffer = buffer_point(&point, &params);
        let ring = buffer.0[0].exterior();

        // 4 * quadrant_segments + 1 coordinates (closed ring)
        assert_eq!(ring.0.len(), 33);
    }

    #[test]
    fn test_non_positive_distance() {
        let params = BufferParams::new(0.0, 16);
        assert!(buffer_point(&Point::new(0.0, 0.0), &params).0.is_empty());

        let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        assert!(buffer_line_string(&line, &params).0.is_empty());

        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        );
        let same = buffer_polygon(&square, &params);
        assert!((same.unsigned_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_capsule_area() {
        let params = BufferParams::new(2000.0, 16);
        let capsule =
            buffer_segment(Coord { x: 0.0, y: 0.0 }, Coord { x: 1000.0, y: 0.0 }, &params);

        // Rectangle plus the polygonal disc formed by the two end caps
        let expected = 1000.0 * 4000.0 + polygon_area(64, 2000.0);
        assert!((capsule.unsigned_area() - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn test_line_string_union_of_capsules() {
        let params = BufferParams::new(1.0, 8);
        let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);

        let buffer = buffer_line_string(&line, &params);
        assert_eq!(buffer.0.len(), 1);

        // Two 10-long strips of width 2 plus roughly one disc
        let area = buffer.unsigned_area();
        assert!(area > 40.0 && area < 40.0 + PI + 1.0, "area {}", area);
    }

    #[test]
    fn test_polygon_buffer_grows() {
        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        );
        let buffer = buffer_polygon(&square, &BufferParams::new(1.0, 16));

        // Square + four edge strips + the corner arcs
        let expected = 100.0 + 40.0 + polygon_area(64, 1.0);
        assert!((buffer.unsigned_area() - expected).abs() < 0.05);
    }

    #[test]
    fn test_smaller_buffer_nested_in_larger() {
        let line = LineString::from(vec![(0.0, 0.0), (500.0, 300.0), (900.0, -200.0)]);
        let small = buffer_line_string(&line, &BufferParams::new(200.0, 16));
        let large = buffer_line_string(&line, &BufferParams::new(500.0, 16));

        let outside = small.difference(&large);
        assert!(outside.unsigned_area() < 1e-6);
    }

    #[test]
    fn test_distance_affects_size() {
        let point = Point::new(0.0, 0.0);

        let small = buffer_point(&point, &BufferParams::new(1.0, 8));
        let big = buffer_point(&point, &BufferParams::new(5.0, 8));

        assert!(
            big.unsigned_area() > small.unsigned_area() * 20.0,
            "Bigger buffer should have ~25x the area"
        );
    }

    #[test]
    fn test_multipoint_overlapping_discs_dissolve() {
        let points = MultiPoint::from(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let buffer = buffer_geometry(&Geometry::MultiPoint(points), &BufferParams::new(2.0, 16));
        assert_eq!(buffer.0.len(), 1);
    }
}
