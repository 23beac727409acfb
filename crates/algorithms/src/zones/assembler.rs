//! Zone collection assembly
//!
//! Clipped band results arrive tagged with their position in the band set.
//! They are put back in band order and exploded into one zone per
//! connected polygon.

use corrozone_core::{BandSpec, Result, Zone, ZoneCollection, CRS};
use geo::{Area, MultiPolygon};
use tracing::{debug, info};

/// One band after clipping.
#[derive(Debug, Clone)]
pub struct ClippedBand {
    /// Position of the band in its band set
    pub index: usize,
    pub band: BandSpec,
    /// `None` when nothing survived the clip
    pub geometry: Option<MultiPolygon<f64>>,
}

/// Build the final zone collection.
///
/// Bands that contribute no zone are reported at info level and skipped.
pub fn assemble(mut results: Vec<ClippedBand>, crs: &CRS) -> Result<ZoneCollection> {
    results.sort_by_key(|r| r.index);

    let mut zones = Vec::new();
    for result in results {
        let before = zones.len();
        if let Some(geometry) = result.geometry {
            for polygon in geometry.0 {
                if polygon.unsigned_area() > 0.0 {
                    zones.push(Zone::new(&result.band, polygon, crs.clone())?);
                }
            }
        }
        let added = zones.len() - before;
        if added == 0 {
            info!(
                "band '{}' [{} m, {} m) produced no zones",
                result.band.label(),
                result.band.inner(),
                result.band.outer()
            );
        } else {
            debug!("band '{}': {} zone(s)", result.band.label(), added);
        }
    }

    ZoneCollection::from_zones(zones, crs.clone())
}
