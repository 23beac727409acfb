//! End-to-end derivation of coastal distance zones
//!
//! Coordinate handling follows three fixed steps:
//! 1. the coastline is brought into the boundary CRS before merging;
//! 2. curve and boundary move to the metric CRS before any buffering;
//! 3. the finished collection is reprojected to the output CRS.

use corrozone_core::crs::require_same;
use corrozone_core::{
    require_linear, Algorithm, BandSet, Boundary, Error, FeatureCollection, Result, ZoneCollection,
    CRS,
};
use tracing::{debug, info, warn};

use super::assembler::{assemble, ClippedBand};
use super::builder::{build_bands, check_quadrant_segments};
use crate::maybe_rayon::*;
use crate::vector::{clip_zone, merge_features, ReferenceCurve, DEFAULT_QUADRANT_SEGMENTS};

/// Parameters for zone derivation
#[derive(Debug, Clone)]
pub struct ZoneParams {
    /// Distance bands, in metres
    pub bands: BandSet,
    /// Projected CRS in which buffers are computed (default: WGS 84 / UTM 24S)
    pub metric_crs: CRS,
    /// CRS of the returned collection (default: WGS 84)
    pub output_crs: CRS,
    /// Edges per quarter circle of every buffer (default: 16)
    pub quadrant_segments: usize,
}

impl Default for ZoneParams {
    fn default() -> Self {
        Self {
            bands: BandSet::corrosion_default(),
            metric_crs: CRS::utm(24, false),
            output_crs: CRS::wgs84(),
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

impl ZoneParams {
    /// Check configuration before any geometry is touched.
    pub fn validate(&self) -> Result<()> {
        require_linear(&self.metric_crs)?;
        check_quadrant_segments(self.quadrant_segments)
    }
}

/// Build, clip and assemble every band around an already-metric curve.
///
/// `curve` and a bounded `boundary` must share one linear CRS.
pub fn build_zone_collection(
    curve: &ReferenceCurve,
    boundary: &Boundary,
    bands: &BandSet,
    quadrant_segments: usize,
) -> Result<ZoneCollection> {
    require_linear(curve.crs())?;
    if let Some(boundary_crs) = boundary.crs() {
        require_same(curve.crs(), boundary_crs)?;
    }
    if !bands.is_ordered() {
        warn!("bands are not in increasing distance order; zones follow the given order");
    }

    let built = build_bands(curve, bands, quadrant_segments)?;
    let clipped = built
        .into_par_iter()
        .enumerate()
        .map(|(index, band)| {
            let geometry = clip_zone(&band.zone, &band.crs, boundary)?;
            Ok(ClippedBand {
                index,
                band: band.band,
                geometry,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    assemble(clipped, curve.crs())
}

/// Derive the zone collection for a coastline and an optional boundary.
pub fn derive_zones(
    coastline: &FeatureCollection,
    boundary: &Boundary,
    params: &ZoneParams,
) -> Result<ZoneCollection> {
    params.validate()?;

    let source = match boundary.crs() {
        Some(crs) => coastline.reproject(crs)?,
        None => coastline.clone(),
    };
    let curve = merge_features(&source)?;
    debug!(
        "merged {} feature(s) into {} part(s)",
        coastline.len(),
        curve.part_count()
    );

    let metric_curve = curve.reproject(&params.metric_crs)?;
    let metric_boundary = boundary.reproject(&params.metric_crs)?;
    let zones = build_zone_collection(
        &metric_curve,
        &metric_boundary,
        &params.bands,
        params.quadrant_segments,
    )?;
    info!(
        "{} zone(s) across {} band(s)",
        zones.len(),
        params.bands.len()
    );

    zones.reproject(&params.output_crs)
}

/// Coastal distance zoning as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct CoastalZones;

impl Algorithm for CoastalZones {
    type Input = (FeatureCollection, Boundary);
    type Output = ZoneCollection;
    type Params = ZoneParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "CoastalZones"
    }

    fn description(&self) -> &'static str {
        "Derive non-overlapping distance-from-coastline bands clipped to a region"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (coastline, boundary) = input;
        derive_zones(&coastline, &boundary, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corrozone_core::BandSpec;
    use geo::{Geometry, LineString};

    #[test]
    fn test_default_params_valid() {
        let params = ZoneParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.bands.len(), 4);
        assert_eq!(params.quadrant_segments, 16);
    }

    #[test]
    fn test_geographic_metric_crs_rejected() {
        let params = ZoneParams {
            metric_crs: CRS::wgs84(),
            ..ZoneParams::default()
        };
        assert!(matches!(params.validate(), Err(Error::NonLinearCrs(_))));
    }

    #[test]
    fn test_config_checked_before_geometry() {
        // A null geometry would fail the merge; the bad config must win
        let mut coastline = FeatureCollection::new(CRS::wgs84());
        coastline.push(corrozone_core::Feature::empty());
        let params = ZoneParams {
            quadrant_segments: 0,
            ..ZoneParams::default()
        };
        assert!(matches!(
            derive_zones(&coastline, &Boundary::Unbounded, &params),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_boundary_crs_must_match_curve() {
        let curve = crate::vector::merge_geometries(
            &[Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1000.0, 0.0)]))],
            &CRS::utm(24, false),
        )
        .unwrap();
        let boundary = Boundary::region(geo::MultiPolygon::new(vec![]), CRS::utm(25, false));
        let bands = BandSet::new(vec![BandSpec::new("C5", 0.0, 2000.0).unwrap()]).unwrap();
        assert!(matches!(
            build_zone_collection(&curve, &boundary, &bands, 16),
            Err(Error::CrsMismatch(_, _))
        ));
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = CoastalZones;
        assert_eq!(algo.name(), "CoastalZones");

        let coastline = FeatureCollection::from_geometries(
            vec![Geometry::LineString(LineString::from(vec![
                (-35.75, -9.70),
                (-35.70, -9.65),
            ]))],
            CRS::wgs84(),
        );
        let zones = algo
            .execute_default((coastline, Boundary::Unbounded))
            .unwrap();
        assert_eq!(zones.labels().len(), 4);
        assert_eq!(zones.crs(), &CRS::wgs84());
    }
}
