//! Clipping operations
//!
//! Intersect zone geometry with a region boundary. Both sides must share
//! one CRS. An envelope test skips the overlay when they cannot touch, and a
//! containment test skips it when the region covers the whole zone.

use corrozone_core::crs::require_same;
use corrozone_core::{Boundary, Result, CRS};
use geo::{Area, BooleanOps, BoundingRect, Contains, MultiPolygon};

use super::spatial::BoundingBox;

/// Clip `zone` (in `crs`) to `boundary`.
///
/// Returns `None` when nothing with positive area remains. The zone comes
/// back untouched when the boundary is unbounded or contains it, so the
/// clipped area never exceeds the zone's.
pub fn clip_zone(
    zone: &MultiPolygon<f64>,
    crs: &CRS,
    boundary: &Boundary,
) -> Result<Option<MultiPolygon<f64>>> {
    let (area, boundary_crs) = match boundary {
        Boundary::Unbounded => {
            return Ok(if zone.0.is_empty() {
                None
            } else {
                Some(zone.clone())
            })
        }
        Boundary::Region { area, crs } => (area, crs),
    };
    require_same(crs, boundary_crs)?;

    let (zone_box, region_box) = match (zone.bounding_rect(), area.bounding_rect()) {
        (Some(z), Some(r)) => (BoundingBox::from(z), BoundingBox::from(r)),
        _ => return Ok(None),
    };
    if !zone_box.intersects(&region_box) {
        return Ok(None);
    }
    if area.contains(zone) {
        return Ok(Some(zone.clone()));
    }

    let clipped = zone.intersection(area);
    Ok(drop_slivers(clipped, zone_box.area()))
}

/// Remove parts whose area vanishes relative to `reference_area`.
fn drop_slivers(geometry: MultiPolygon<f64>, reference_area: f64) -> Option<MultiPolygon<f64>> {
    let threshold = f64::EPSILON * reference_area.max(1.0);
    let parts: Vec<_> = geometry
        .0
        .into_iter()
        .filter(|p| p.unsigned_area() > threshold)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(MultiPolygon::new(parts))
    }
}
