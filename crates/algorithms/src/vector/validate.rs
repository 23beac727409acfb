//! Geometry validity checks run before any buffering
//!
//! Only defects the boolean-overlay kernel cannot repair are rejected:
//! empty parts, non-finite coordinates, lines without length and rings that
//! enclose no area (collapsed rings and symmetric bow-ties). Ordinary
//! self-intersections are left to the union step.

use geo::{Area, BoundingRect, Coord, Geometry, LineString, Polygon};

/// Check one geometry. The error is a human-readable reason.
pub fn validate_geometry(geometry: &Geometry<f64>) -> Result<(), String> {
    match geometry {
        Geometry::Point(p) => check_coord(&p.0),
        Geometry::Line(l) => {
            check_coord(&l.start)?;
            check_coord(&l.end)?;
            if l.start == l.end {
                return Err("line has zero length".to_string());
            }
            Ok(())
        }
        Geometry::LineString(ls) => validate_line_string(ls),
        Geometry::Polygon(p) => validate_polygon(p),
        Geometry::MultiPoint(mp) => {
            if mp.0.is_empty() {
                return Err("empty multipoint".to_string());
            }
            mp.0.iter().try_for_each(|p| check_coord(&p.0))
        }
        Geometry::MultiLineString(mls) => {
            if mls.0.is_empty() {
                return Err("empty multilinestring".to_string());
            }
            mls.0.iter().try_for_each(validate_line_string)
        }
        Geometry::MultiPolygon(mp) => {
            if mp.0.is_empty() {
                return Err("empty multipolygon".to_string());
            }
            mp.0.iter().try_for_each(validate_polygon)
        }
        Geometry::Rect(r) => {
            check_coord(&r.min())?;
            check_coord(&r.max())?;
            if r.width() <= 0.0 || r.height() <= 0.0 {
                return Err("rectangle has zero area".to_string());
            }
            Ok(())
        }
        Geometry::Triangle(t) => validate_polygon(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            if gc.0.is_empty() {
                return Err("empty geometry collection".to_string());
            }
            gc.0.iter().try_for_each(validate_geometry)
        }
    }
}

fn check_coord(c: &Coord<f64>) -> Result<(), String> {
    if c.x.is_finite() && c.y.is_finite() {
        Ok(())
    } else {
        Err(format!("non-finite coordinate ({}, {})", c.x, c.y))
    }
}

fn validate_line_string(ls: &LineString<f64>) -> Result<(), String> {
    if ls.0.is_empty() {
        return Err("empty linestring".to_string());
    }
    ls.0.iter().try_for_each(check_coord)?;
    let first = ls.0[0];
    if ls.0.iter().all(|c| *c == first) {
        return Err("linestring has fewer than two distinct vertices".to_string());
    }
    Ok(())
}

fn validate_ring(ring: &LineString<f64>, which: &str) -> Result<(), String> {
    ring.0.iter().try_for_each(check_coord)?;
    // Rings are closed by geo-types, so a triangle has four coordinates
    if ring.0.len() < 4 {
        return Err(format!("{} ring has fewer than three vertices", which));
    }
    let area = Polygon::new(ring.clone(), vec![]).signed_area().abs();
    let envelope = ring
        .bounding_rect()
        .map(|r| r.width() * r.height())
        .unwrap_or(0.0);
    if area <= f64::EPSILON * envelope.max(1.0) {
        return Err(format!(
            "{} ring encloses no area (collapsed or self-intersecting)",
            which
        ));
    }
    Ok(())
}

fn validate_polygon(p: &Polygon<f64>) -> Result<(), String> {
    if p.exterior().0.is_empty() {
        return Err("empty polygon".to_string());
    }
    validate_ring(p.exterior(), "exterior")?;
    p.interiors()
        .iter()
        .try_for_each(|ring| validate_ring(ring, "interior"))
}
