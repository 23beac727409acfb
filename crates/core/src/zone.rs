//! Distance bands and the classified zones built from them

use geo::{Area, BoundingRect, Rect};
use geo_types::Polygon;
use serde::{Deserialize, Serialize};

use crate::crs::{reproject, CRS};
use crate::error::{Error, Result};

/// One distance interval `[inner, outer)` in metres, with its class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBand")]
pub struct BandSpec {
    label: String,
    inner: f64,
    outer: f64,
}

#[derive(Deserialize)]
struct RawBand {
    label: String,
    inner: f64,
    outer: f64,
}

impl TryFrom<RawBand> for BandSpec {
    type Error = Error;

    fn try_from(raw: RawBand) -> Result<Self> {
        BandSpec::new(raw.label, raw.inner, raw.outer)
    }
}

impl BandSpec {
    /// Create a validated band.
    ///
    /// Distances must be finite, `inner >= 0` and `outer > inner`.
    pub fn new(label: impl Into<String>, inner: f64, outer: f64) -> Result<Self> {
        let label = label.into();
        let fail = |reason: String| Error::InvalidBand {
            label: label.clone(),
            reason,
        };
        if label.trim().is_empty() {
            return Err(fail("label must not be empty".to_string()));
        }
        if !inner.is_finite() || !outer.is_finite() {
            return Err(fail(format!(
                "distances must be finite (inner={}, outer={})",
                inner, outer
            )));
        }
        if inner < 0.0 {
            return Err(fail(format!("inner distance {} is negative", inner)));
        }
        if outer <= inner {
            return Err(fail(format!(
                "outer distance {} must exceed inner distance {}",
                outer, inner
            )));
        }
        Ok(Self { label, inner, outer })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inner(&self) -> f64 {
        self.inner
    }

    pub fn outer(&self) -> f64 {
        self.outer
    }

    /// Whether a distance from the coastline falls in this band.
    pub fn contains_distance(&self, distance: f64) -> bool {
        distance >= self.inner && distance < self.outer
    }
}

/// Ordered, non-empty list of bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BandSpec>", into = "Vec<BandSpec>")]
pub struct BandSet {
    bands: Vec<BandSpec>,
}

impl TryFrom<Vec<BandSpec>> for BandSet {
    type Error = Error;

    fn try_from(bands: Vec<BandSpec>) -> Result<Self> {
        BandSet::new(bands)
    }
}

impl From<BandSet> for Vec<BandSpec> {
    fn from(set: BandSet) -> Self {
        set.bands
    }
}

impl BandSet {
    pub fn new(bands: Vec<BandSpec>) -> Result<Self> {
        if bands.is_empty() {
            return Err(Error::InvalidParameter {
                name: "bands",
                value: "[]".to_string(),
                reason: "at least one band is required".to_string(),
            });
        }
        Ok(Self { bands })
    }

    /// Corrosivity classes C5..C2 by distance from the sea.
    pub fn corrosion_default() -> Self {
        let table = [
            ("C5 - Muito Alta", 0.0, 2_000.0),
            ("C4 - Alta", 2_000.0, 5_000.0),
            ("C3 - Média", 5_000.0, 10_000.0),
            ("C2 - Baixa", 10_000.0, 20_000.0),
        ];
        Self {
            bands: table
                .iter()
                .map(|&(label, inner, outer)| BandSpec {
                    label: label.to_string(),
                    inner,
                    outer,
                })
                .collect(),
        }
    }

    /// Parse a JSON array of `{"label", "inner", "outer"}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BandSpec> {
        self.bands.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandSpec> {
        self.bands.iter()
    }

    pub fn as_slice(&self) -> &[BandSpec] {
        &self.bands
    }

    /// True when bands are given by non-decreasing inner distance, the order
    /// that lets nearer bands draw on top.
    pub fn is_ordered(&self) -> bool {
        self.bands.windows(2).all(|w| w[0].inner <= w[1].inner)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.bands.iter().any(|b| b.label == label)
    }
}

/// A classified region: one connected polygon of one band.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    label: String,
    inner: f64,
    outer: f64,
    geometry: Polygon<f64>,
    crs: CRS,
}

impl Zone {
    /// Create a zone for `band`. Empty or zero-area polygons are rejected.
    pub fn new(band: &BandSpec, geometry: Polygon<f64>, crs: CRS) -> Result<Self> {
        if geometry.exterior().0.is_empty() || geometry.unsigned_area() <= 0.0 {
            return Err(Error::invalid_geometry(
                format!("zone '{}'", band.label()),
                "zone geometry is empty",
            ));
        }
        Ok(Self {
            label: band.label.clone(),
            inner: band.inner,
            outer: band.outer,
            geometry,
            crs,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Inner distance of the originating band, in metres.
    pub fn inner(&self) -> f64 {
        self.inner
    }

    /// Outer distance of the originating band, in metres.
    pub fn outer(&self) -> f64 {
        self.outer
    }

    pub fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    /// Planar area in CRS units squared.
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    fn reproject(&self, target: &CRS) -> Result<Self> {
        Ok(Self {
            label: self.label.clone(),
            inner: self.inner,
            outer: self.outer,
            geometry: reproject(&self.geometry, &self.crs, target)?,
            crs: target.clone(),
        })
    }
}

/// Ordered zones of one run, all in the same CRS.
///
/// Built once by the assembler and read by exporters and map views.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCollection {
    zones: Vec<Zone>,
    crs: CRS,
}

impl ZoneCollection {
    /// A collection with no zones (e.g. a boundary far from the coast).
    pub fn empty(crs: CRS) -> Self {
        Self {
            zones: Vec::new(),
            crs,
        }
    }

    /// Wrap `zones`, checking that each one is in `crs`.
    pub fn from_zones(zones: Vec<Zone>, crs: CRS) -> Result<Self> {
        for zone in &zones {
            if !zone.crs.is_equivalent(&crs) {
                return Err(Error::CrsMismatch(zone.crs.identifier(), crs.identifier()));
            }
        }
        Ok(Self { zones, crs })
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Number of zones carrying `label`.
    pub fn count_for(&self, label: &str) -> usize {
        self.zones.iter().filter(|z| z.label == label).count()
    }

    /// Summed area of the zones carrying `label`.
    pub fn area_for(&self, label: &str) -> f64 {
        self.zones
            .iter()
            .filter(|z| z.label == label)
            .map(Zone::area)
            .sum()
    }

    /// Distinct labels in first-appearance order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for zone in &self.zones {
            if !labels.contains(&zone.label()) {
                labels.push(zone.label());
            }
        }
        labels
    }

    /// Envelope of every zone; `None` for an empty collection.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.zones
            .iter()
            .filter_map(|z| z.geometry.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// A new collection with every zone reprojected into `target`.
    pub fn reproject(&self, target: &CRS) -> Result<Self> {
        let zones = self
            .zones
            .iter()
            .map(|z| z.reproject(target))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            zones,
            crs: target.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::LineString;

    fn square(x0: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, 0.0),
                (x0 + size, 0.0),
                (x0 + size, size),
                (x0, size),
                (x0, 0.0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_band_validation() {
        assert!(BandSpec::new("C5", 0.0, 2000.0).is_ok());
        assert!(matches!(
            BandSpec::new("C4", 2000.0, 2000.0),
            Err(Error::InvalidBand { label, .. }) if label == "C4"
        ));
        assert!(BandSpec::new("C4", 5000.0, 2000.0).is_err());
        assert!(BandSpec::new("C3", -1.0, 10.0).is_err());
        assert!(BandSpec::new("C2", 0.0, f64::INFINITY).is_err());
        assert!(BandSpec::new("C2", f64::NAN, 10.0).is_err());
        assert!(BandSpec::new("  ", 0.0, 10.0).is_err());
    }

    #[test]
    fn test_band_contains_distance() {
        let band = BandSpec::new("C4", 2000.0, 5000.0).unwrap();
        assert!(band.contains_distance(2000.0));
        assert!(band.contains_distance(4999.9));
        assert!(!band.contains_distance(5000.0));
        assert!(!band.contains_distance(1999.9));
    }

    #[test]
    fn test_default_bands_are_ordered_and_adjacent() {
        let set = BandSet::corrosion_default();
        assert_eq!(set.len(), 4);
        assert!(set.is_ordered());
        for w in set.as_slice().windows(2) {
            assert_eq!(w[0].outer(), w[1].inner());
        }
        assert_eq!(set.get(0).unwrap().label(), "C5 - Muito Alta");
    }

    #[test]
    fn test_band_set_from_json() {
        let json = r#"[
            {"label": "near", "inner": 0, "outer": 500},
            {"label": "far", "inner": 500, "outer": 1500}
        ]"#;
        let set = BandSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().outer(), 1500.0);
    }

    #[test]
    fn test_band_set_from_json_rejects_bad_band() {
        let json = r#"[{"label": "bad", "inner": 10, "outer": 5}]"#;
        let err = BandSet::from_json(json).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_band_set_rejects_empty() {
        assert!(BandSet::new(Vec::new()).is_err());
        assert!(BandSet::from_json("[]").is_err());
    }

    #[test]
    fn test_band_set_order_detection() {
        let set = BandSet::new(vec![
            BandSpec::new("far", 500.0, 1000.0).unwrap(),
            BandSpec::new("near", 0.0, 500.0).unwrap(),
        ])
        .unwrap();
        assert!(!set.is_ordered());
        assert!(set.contains_label("near"));
        assert!(!set.contains_label("mid"));
    }

    #[test]
    fn test_zone_rejects_empty_geometry() {
        let band = BandSpec::new("C5", 0.0, 10.0).unwrap();
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        assert!(matches!(
            Zone::new(&band, empty, CRS::utm(24, false)),
            Err(Error::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_collection_queries() {
        let c5 = BandSpec::new("C5", 0.0, 10.0).unwrap();
        let c4 = BandSpec::new("C4", 10.0, 20.0).unwrap();
        let crs = CRS::utm(24, false);
        let zones = vec![
            Zone::new(&c5, square(0.0, 10.0), crs.clone()).unwrap(),
            Zone::new(&c4, square(20.0, 5.0), crs.clone()).unwrap(),
            Zone::new(&c5, square(40.0, 2.0), crs.clone()).unwrap(),
        ];
        let collection = ZoneCollection::from_zones(zones, crs).unwrap();

        assert_eq!(collection.count_for("C5"), 2);
        assert_eq!(collection.count_for("C3"), 0);
        assert!((collection.area_for("C5") - 104.0).abs() < 1e-9);
        assert_eq!(collection.labels(), vec!["C5", "C4"]);

        let bounds = collection.bounds().unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.max().x, 42.0);
        assert_eq!(bounds.max().y, 10.0);
    }

    #[test]
    fn test_collection_rejects_mixed_crs() {
        let band = BandSpec::new("C5", 0.0, 10.0).unwrap();
        let zone = Zone::new(&band, square(0.0, 1.0), CRS::utm(24, false)).unwrap();
        let err = ZoneCollection::from_zones(vec![zone], CRS::utm(25, false)).unwrap_err();
        assert!(matches!(err, Error::CrsMismatch(_, _)));
    }

    #[test]
    fn test_collection_reproject() {
        let band = BandSpec::new("C5", 0.0, 10.0).unwrap();
        let crs = CRS::utm(25, false);
        let poly = Polygon::new(
            LineString::from(vec![
                (200_000.0, 8_930_000.0),
                (201_000.0, 8_930_000.0),
                (201_000.0, 8_931_000.0),
                (200_000.0, 8_930_000.0),
            ]),
            vec![],
        );
        let zone = Zone::new(&band, poly, crs.clone()).unwrap();
        let collection = ZoneCollection::from_zones(vec![zone], crs).unwrap();

        let geo = collection.reproject(&CRS::wgs84()).unwrap();
        assert_eq!(geo.crs().epsg(), Some(4326));
        assert_eq!(geo.zones()[0].crs().epsg(), Some(4326));
        let c = geo.zones()[0].geometry().exterior().0[0];
        assert!(c.x > -39.0 && c.x < -33.0);
        assert!(c.y > -11.0 && c.y < -9.0);
        assert!(ZoneCollection::empty(CRS::wgs84()).bounds().is_none());
    }
}
