//! Geometry merge: many coastline features into one reference curve
//!
//! Areal parts are dissolved with a boolean union, linear parts and points
//! are collected as-is. Every input is validated first so that defects the
//! overlay cannot repair are reported against the feature that caused them.

use corrozone_core::crs::reproject;
use corrozone_core::vector::{repair_polygon, union_polygons};
use corrozone_core::{Error, FeatureCollection, Result, CRS};
use geo::{
    BoundingRect, Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Rect,
};

use super::buffer::{buffer_line_string, buffer_point, buffer_polygon, BufferParams};
use super::validate::validate_geometry;
use crate::maybe_rayon::*;

/// The merged coastline used as the origin of every distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve {
    lines: MultiLineString<f64>,
    areas: MultiPolygon<f64>,
    points: MultiPoint<f64>,
    crs: CRS,
}

impl ReferenceCurve {
    /// A curve with no parts.
    pub fn empty(crs: CRS) -> Self {
        Self {
            lines: MultiLineString::new(vec![]),
            areas: MultiPolygon::new(vec![]),
            points: MultiPoint::new(vec![]),
            crs,
        }
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    pub fn lines(&self) -> &MultiLineString<f64> {
        &self.lines
    }

    pub fn areas(&self) -> &MultiPolygon<f64> {
        &self.areas
    }

    pub fn points(&self) -> &MultiPoint<f64> {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.lines.0.is_empty() && self.areas.0.is_empty() && self.points.0.is_empty()
    }

    /// Number of lines, polygons and points making up the curve
    pub fn part_count(&self) -> usize {
        self.lines.0.len() + self.areas.0.len() + self.points.0.len()
    }

    /// Envelope of every part; `None` for an empty curve.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        [
            self.lines.bounding_rect(),
            self.areas.bounding_rect(),
            self.points.bounding_rect(),
        ]
        .into_iter()
        .flatten()
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
    }

    /// Reproject every part into `target`.
    pub fn reproject(&self, target: &CRS) -> Result<Self> {
        Ok(Self {
            lines: reproject(&self.lines, &self.crs, target)?,
            areas: reproject(&self.areas, &self.crs, target)?,
            points: reproject(&self.points, &self.crs, target)?,
            crs: target.clone(),
        })
    }

    /// Planar buffer of the whole curve at `distance` CRS units.
    ///
    /// Parts are buffered independently and dissolved. A non-positive
    /// distance leaves only the areal parts.
    pub fn buffer(&self, distance: f64, quadrant_segments: usize) -> MultiPolygon<f64> {
        let params = BufferParams::new(distance, quadrant_segments);
        let mut pieces: Vec<MultiPolygon<f64>> = (&self.lines.0)
            .into_par_iter()
            .map(|ls| buffer_line_string(ls, &params))
            .collect();
        pieces.extend(self.areas.0.iter().map(|p| buffer_polygon(p, &params)));
        pieces.extend(self.points.0.iter().map(|p| buffer_point(p, &params)));
        pieces.retain(|mp| !mp.0.is_empty());
        union_polygons(pieces)
    }
}

#[derive(Default)]
struct Parts {
    lines: Vec<LineString<f64>>,
    polygons: Vec<Polygon<f64>>,
    points: Vec<Point<f64>>,
}

impl Parts {
    fn collect(&mut self, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(p) => self.points.push(*p),
            Geometry::Line(l) => self.lines.push(LineString::from(vec![l.start, l.end])),
            Geometry::LineString(ls) => self.lines.push(ls.clone()),
            Geometry::Polygon(p) => self.polygons.push(p.clone()),
            Geometry::MultiPoint(mp) => self.points.extend(mp.0.iter().copied()),
            Geometry::MultiLineString(mls) => self.lines.extend(mls.0.iter().cloned()),
            Geometry::MultiPolygon(mp) => self.polygons.extend(mp.0.iter().cloned()),
            Geometry::Rect(r) => self.polygons.push(r.to_polygon()),
            Geometry::Triangle(t) => self.polygons.push(t.to_polygon()),
            Geometry::GeometryCollection(gc) => {
                for g in gc.iter() {
                    self.collect(g);
                }
            }
        }
    }
}

/// Merge geometries sharing `crs` into a reference curve.
///
/// Fails with `InvalidGeometry` naming the index of the first geometry that
/// cannot be repaired. A single input is kept as given.
pub fn merge_geometries(geometries: &[Geometry<f64>], crs: &CRS) -> Result<ReferenceCurve> {
    for (index, geometry) in geometries.iter().enumerate() {
        validate_geometry(geometry)
            .map_err(|reason| Error::invalid_geometry(format!("geometry {}", index), reason))?;
    }
    Ok(dissolve(geometries.iter(), crs))
}

/// Merge every feature of a collection into a reference curve.
///
/// A null geometry is an error naming the feature (by id when it has one).
pub fn merge_features(features: &FeatureCollection) -> Result<ReferenceCurve> {
    let mut geometries = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let context = match &feature.id {
            Some(id) => format!("feature {} (id {})", index, id),
            None => format!("feature {}", index),
        };
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| Error::invalid_geometry(context.clone(), "null geometry"))?;
        validate_geometry(geometry).map_err(|reason| Error::invalid_geometry(context, reason))?;
        geometries.push(geometry);
    }
    Ok(dissolve(geometries.into_iter(), features.crs()))
}

fn dissolve<'a>(geometries: impl Iterator<Item = &'a Geometry<f64>>, crs: &CRS) -> ReferenceCurve {
    let mut parts = Parts::default();
    let mut count = 0;
    for geometry in geometries {
        parts.collect(geometry);
        count += 1;
    }

    // A lone input keeps its polygons exactly as given
    let areas = if count <= 1 || parts.polygons.len() <= 1 {
        MultiPolygon::new(parts.polygons)
    } else {
        union_polygons(parts.polygons.iter().map(repair_polygon).collect())
    };

    ReferenceCurve {
        lines: MultiLineString::new(parts.lines),
        areas,
        points: MultiPoint::new(parts.points),
        crs: crs.clone(),
    }
}
