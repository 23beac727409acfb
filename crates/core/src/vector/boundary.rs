//! Region-of-interest boundaries used to clip zones

use geo::orient::{Direction, Orient};
use geo::{unary_union, BooleanOps, BoundingRect, Rect};
use geo_types::{Geometry, MultiPolygon, Polygon};

use super::FeatureCollection;
use crate::crs::{reproject, CRS};
use crate::error::{Error, Result};

/// Clip boundary for distance zones.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// The full plane: zones pass through unclipped
    Unbounded,
    /// A polygonal region in a known CRS
    Region { area: MultiPolygon<f64>, crs: CRS },
}

impl Boundary {
    pub fn region(area: MultiPolygon<f64>, crs: CRS) -> Self {
        Boundary::Region { area, crs }
    }

    /// Dissolve every polygonal feature of `features` into one region.
    ///
    /// Lines and points are ignored; null geometries are skipped. Fails when
    /// nothing polygonal is left.
    pub fn from_features(features: &FeatureCollection, source_name: &str) -> Result<Self> {
        let mut parts = Vec::new();
        for feature in features.iter() {
            if let Some(geometry) = &feature.geometry {
                collect_polygons(geometry, &mut parts);
            }
        }
        if parts.is_empty() {
            return Err(Error::BoundaryRead {
                source_name: source_name.to_string(),
                reason: "no polygonal geometry in selected features".to_string(),
            });
        }
        let area = union_polygons(parts.iter().map(repair_polygon).collect());
        Ok(Boundary::Region {
            area,
            crs: features.crs().clone(),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Boundary::Unbounded)
    }

    /// CRS of the region; `None` when unbounded.
    pub fn crs(&self) -> Option<&CRS> {
        match self {
            Boundary::Unbounded => None,
            Boundary::Region { crs, .. } => Some(crs),
        }
    }

    /// Envelope of the region; `None` when unbounded or empty.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Boundary::Unbounded => None,
            Boundary::Region { area, .. } => area.bounding_rect(),
        }
    }

    /// Reproject the region into `target`. The unbounded plane is CRS-free.
    pub fn reproject(&self, target: &CRS) -> Result<Self> {
        match self {
            Boundary::Unbounded => Ok(Boundary::Unbounded),
            Boundary::Region { area, crs } => Ok(Boundary::Region {
                area: reproject(area, crs, target)?,
                crs: target.clone(),
            }),
        }
    }
}

fn collect_polygons(geometry: &Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p.clone()),
        Geometry::MultiPolygon(mp) => out.extend(mp.0.iter().cloned()),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.iter() {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

/// Resolve self-intersections with the even-odd rule, so a bow-tie becomes
/// its two lobes.
pub fn repair_polygon(polygon: &Polygon<f64>) -> MultiPolygon<f64> {
    polygon.union(&MultiPolygon::new(vec![]))
}

/// Dissolve polygonal parts into one multipolygon.
///
/// `unary_union` fills by winding, so parts are reoriented first. Parts must
/// be free of self-intersections; pass user input through [`repair_polygon`].
pub fn union_polygons(parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    let oriented: Vec<MultiPolygon<f64>> =
        parts.iter().map(|p| p.orient(Direction::Default)).collect();
    unary_union(&oriented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Feature;
    use geo::Area;
    use geo_types::{LineString, Point};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_union_polygons_overlapping() {
        let parts = vec![
            MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]),
            MultiPolygon::new(vec![square(5.0, 0.0, 10.0)]),
            MultiPolygon::new(vec![square(30.0, 30.0, 1.0)]),
        ];
        let merged = union_polygons(parts);
        assert_eq!(merged.0.len(), 2);
        assert!((merged.unsigned_area() - 151.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_polygons_empty() {
        assert!(union_polygons(Vec::new()).0.is_empty());
    }

    #[test]
    fn test_union_polygons_mixed_winding() {
        let ccw = square(0.0, 0.0, 10.0);
        let mut cw = square(5.0, 0.0, 10.0);
        cw.exterior_mut(|ring| ring.0.reverse());
        let merged = union_polygons(vec![
            MultiPolygon::new(vec![ccw]),
            MultiPolygon::new(vec![cw]),
        ]);
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_repair_bowtie_keeps_both_lobes() {
        // Lobes meet at (2, 2): 0.5 * 4 * 2 each
        let bowtie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![],
        );
        let repaired = repair_polygon(&bowtie);
        assert!((repaired.unsigned_area() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_features_dissolves_adjacent() {
        let fc = FeatureCollection::with_features(
            vec![
                Feature::new(Geometry::Polygon(square(0.0, 0.0, 10.0))),
                Feature::new(Geometry::Polygon(square(10.0, 0.0, 10.0))),
                Feature::new(Geometry::Point(Point::new(50.0, 50.0))),
                Feature::empty(),
            ],
            CRS::utm(24, false),
        );
        let boundary = Boundary::from_features(&fc, "states").unwrap();
        match &boundary {
            Boundary::Region { area, crs } => {
                assert_eq!(area.0.len(), 1);
                assert!((area.unsigned_area() - 200.0).abs() < 1e-6);
                assert_eq!(crs.epsg(), Some(32724));
            }
            Boundary::Unbounded => panic!("expected a region"),
        }
    }

    #[test]
    fn test_from_features_without_polygons() {
        let fc = FeatureCollection::from_geometries(
            vec![Geometry::Point(Point::new(1.0, 1.0))],
            CRS::wgs84(),
        );
        let err = Boundary::from_features(&fc, "points.geojson").unwrap_err();
        assert!(matches!(
            err,
            Error::BoundaryRead { source_name, .. } if source_name == "points.geojson"
        ));
    }

    #[test]
    fn test_unbounded_reprojects_to_itself() {
        let b = Boundary::Unbounded.reproject(&CRS::wgs84()).unwrap();
        assert!(b.is_unbounded());
        assert!(b.crs().is_none());
        assert!(b.bounding_rect().is_none());
    }
}
