//! Zone builder: one distance band around the reference curve
//!
//! The zone of a band `[inner, outer)` is `buffer(outer) - buffer(inner)`,
//! or the outer buffer itself when `inner` is zero.

use std::collections::HashMap;

use corrozone_core::{require_linear, BandSet, BandSpec, Error, Result, CRS};
use geo::{BooleanOps, MultiPolygon};
use tracing::debug;

use crate::maybe_rayon::*;
use crate::vector::ReferenceCurve;

/// Geometry of one band before clipping.
#[derive(Debug, Clone)]
pub struct BandGeometry {
    pub band: BandSpec,
    /// Buffer at the outer distance
    pub outer: MultiPolygon<f64>,
    /// Buffer at the inner distance; `None` when the band starts at the curve
    pub inner: Option<MultiPolygon<f64>>,
    /// Points whose distance to the curve lies in `[inner, outer)`
    pub zone: MultiPolygon<f64>,
    pub crs: CRS,
}

impl BandGeometry {
    pub fn is_empty(&self) -> bool {
        self.zone.0.is_empty()
    }
}

pub(crate) fn check_quadrant_segments(quadrant_segments: usize) -> Result<()> {
    if quadrant_segments == 0 {
        return Err(Error::InvalidParameter {
            name: "quadrant_segments",
            value: quadrant_segments.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn compose(
    band: &BandSpec,
    outer: MultiPolygon<f64>,
    inner: Option<MultiPolygon<f64>>,
    crs: &CRS,
) -> BandGeometry {
    let zone = match &inner {
        None => outer.clone(),
        Some(inner) => outer.difference(inner),
    };
    debug!(
        "band '{}' [{}, {}): {} outer part(s), {} zone part(s)",
        band.label(),
        band.inner(),
        band.outer(),
        outer.0.len(),
        zone.0.len()
    );
    BandGeometry {
        band: band.clone(),
        outer,
        inner,
        zone,
        crs: crs.clone(),
    }
}

/// Build the unclipped geometry of a single band.
///
/// The curve must be in a linear CRS. An empty curve gives an empty zone.
pub fn build_band(
    curve: &ReferenceCurve,
    band: &BandSpec,
    quadrant_segments: usize,
) -> Result<BandGeometry> {
    require_linear(curve.crs())?;
    check_quadrant_segments(quadrant_segments)?;

    let outer = curve.buffer(band.outer(), quadrant_segments);
    let inner = if band.inner() == 0.0 {
        None
    } else {
        Some(curve.buffer(band.inner(), quadrant_segments))
    };
    Ok(compose(band, outer, inner, curve.crs()))
}

/// Build every band of `bands`, in band order.
///
/// Each distinct radius is buffered once, so adjacent bands sharing an
/// edge distance reuse the same polygon.
pub fn build_bands(
    curve: &ReferenceCurve,
    bands: &BandSet,
    quadrant_segments: usize,
) -> Result<Vec<BandGeometry>> {
    require_linear(curve.crs())?;
    check_quadrant_segments(quadrant_segments)?;

    let mut radii: Vec<f64> = bands
        .iter()
        .flat_map(|b| [b.inner(), b.outer()])
        .filter(|r| *r > 0.0)
        .collect();
    radii.sort_by(|a, b| a.total_cmp(b));
    radii.dedup();
    debug!("buffering {} distinct radii", radii.len());

    let cache: HashMap<u64, MultiPolygon<f64>> = radii
        .into_par_iter()
        .map(|r| (r.to_bits(), curve.buffer(r, quadrant_segments)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();
    let buffer_at = |r: f64| {
        cache
            .get(&r.to_bits())
            .cloned()
            .unwrap_or_else(|| curve.buffer(r, quadrant_segments))
    };

    Ok(bands
        .iter()
        .map(|band| {
            let inner = (band.inner() > 0.0).then(|| buffer_at(band.inner()));
            compose(band, buffer_at(band.outer()), inner, curve.crs())
        })
        .collect())
}
