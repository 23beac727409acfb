//! Zone export in the supported vector formats

use std::fmt;
use std::path::Path;

use super::geojson_io::{write_feature_collection, zone_features};
use super::kml_io::write_kml;
use super::shapefile_io::write_shapefile;
use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::zone::ZoneCollection;

/// Output file format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// ESRI shapefile (`.shp` with `.shx`, `.dbf`, `.prj`)
    Shapefile,
    /// RFC 7946 GeoJSON
    GeoJson,
    /// Keyhole Markup Language
    Kml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Shapefile,
        ExportFormat::GeoJson,
        ExportFormat::Kml,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Shapefile => "shp",
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "shp" => Some(ExportFormat::Shapefile),
            "geojson" | "json" => Some(ExportFormat::GeoJson),
            "kml" => Some(ExportFormat::Kml),
            _ => None,
        }
    }

    /// GeoJSON and KML store longitude/latitude only.
    pub fn requires_geographic(&self) -> bool {
        !matches!(self, ExportFormat::Shapefile)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Shapefile => "Shapefile",
            ExportFormat::GeoJson => "GeoJSON",
            ExportFormat::Kml => "KML",
        };
        write!(f, "{}", name)
    }
}

/// Reproject `zones` into `target_crs` and write them to `destination` in
/// `format`.
///
/// GeoJSON and KML targets must be geographic; the check runs before
/// anything is written.
pub fn export<P: AsRef<Path>>(
    zones: &ZoneCollection,
    target_crs: &CRS,
    destination: P,
    format: ExportFormat,
) -> Result<()> {
    if format.requires_geographic() && !target_crs.is_geographic() {
        return Err(Error::InvalidParameter {
            name: "target_crs",
            value: target_crs.identifier(),
            reason: format!("{} export requires a geographic CRS", format),
        });
    }
    let target = zones.reproject(target_crs)?;
    match format {
        ExportFormat::Shapefile => write_shapefile(&target, target_crs, destination),
        ExportFormat::GeoJson => {
            write_feature_collection(zone_features(&target), target_crs, destination)
        }
        ExportFormat::Kml => write_kml(&target, destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_features;
    use crate::zone::{BandSpec, Zone};
    use geo_types::{Geometry, LineString, Polygon};
    use shapefile::dbase::{FieldValue, Record};

    fn sample_zones() -> ZoneCollection {
        let band = BandSpec::new("C5", 0.0, 2000.0).unwrap();
        let crs = CRS::utm(25, false);
        let poly = Polygon::new(
            LineString::from(vec![
                (200_000.0, 8_930_000.0),
                (202_000.0, 8_930_000.0),
                (202_000.0, 8_932_000.0),
                (200_000.0, 8_930_000.0),
            ]),
            vec![],
        );
        let zone = Zone::new(&band, poly, crs.clone()).unwrap();
        ZoneCollection::from_zones(vec![zone], crs).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path("a/zonas.SHP"), Some(ExportFormat::Shapefile));
        assert_eq!(ExportFormat::from_path("zonas.geojson"), Some(ExportFormat::GeoJson));
        assert_eq!(ExportFormat::from_path("zonas.kml"), Some(ExportFormat::Kml));
        assert_eq!(ExportFormat::from_path("zonas.gpkg"), None);
        assert_eq!(ExportFormat::from_path("zonas"), None);
    }

    #[test]
    fn test_geojson_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.geojson");
        export(&sample_zones(), &CRS::wgs84(), &path, ExportFormat::GeoJson).unwrap();

        let back = load_features(&path).unwrap();
        assert_eq!(back.crs().epsg(), Some(4326));
        assert_eq!(back.len(), 1);
        assert!(back.features[0].property_matches("zone", "C5"));
        match &back.features[0].geometry {
            Some(Geometry::Polygon(p)) => {
                let c = p.exterior().0[0];
                assert!(c.x > -36.0 && c.x < -35.0);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_geojson_keeps_sirgas_crs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones_sirgas.geojson");
        export(&sample_zones(), &CRS::sirgas2000(), &path, ExportFormat::GeoJson).unwrap();
        assert_eq!(load_features(&path).unwrap().crs().epsg(), Some(4674));
    }

    #[test]
    fn test_projected_target_rejected_for_geojson_and_kml() {
        let dir = tempfile::tempdir().unwrap();
        for format in [ExportFormat::GeoJson, ExportFormat::Kml] {
            let path = dir.path().join(format!("zones.{}", format.extension()));
            let err = export(&sample_zones(), &CRS::utm(25, false), &path, format).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "target_crs", .. }));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_kml_placemarks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.kml");
        export(&sample_zones(), &CRS::wgs84(), &path, ExportFormat::Kml).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<Placemark"));
        assert!(text.contains("<name>C5</name>"));
        assert!(text.contains("<coordinates>"));
        assert!(text.contains("-35."));
        assert!(!text.contains("200000"));
    }

    #[test]
    fn test_shapefile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.shp");
        export(&sample_zones(), &CRS::wgs84(), &path, ExportFormat::Shapefile).unwrap();

        assert!(path.with_extension("shx").exists());
        assert!(path.with_extension("dbf").exists());
        let prj = std::fs::read_to_string(path.with_extension("prj")).unwrap();
        assert!(prj.contains("WGS_1984"));

        let shapes = shapefile::read_as::<_, shapefile::Polygon, Record>(&path).unwrap();
        assert_eq!(shapes.len(), 1);
        let (shape, record) = &shapes[0];
        match record.get("zone") {
            Some(FieldValue::Character(Some(label))) => assert_eq!(label.trim(), "C5"),
            other => panic!("unexpected zone field {:?}", other),
        }
        match record.get("outer_m") {
            Some(FieldValue::Numeric(Some(outer))) => assert_eq!(*outer, 2000.0),
            other => panic!("unexpected outer_m field {:?}", other),
        }
        let bbox = shape.bbox();
        assert!(bbox.min.x > -36.0 && bbox.max.x < -35.0);
    }

    #[test]
    fn test_shapefile_accepts_projected_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones_utm.shp");
        export(&sample_zones(), &CRS::utm(25, false), &path, ExportFormat::Shapefile).unwrap();

        let shapes = shapefile::read_as::<_, shapefile::Polygon, Record>(&path).unwrap();
        assert!((shapes[0].0.bbox().min.x - 200_000.0).abs() < 1e-3);
        // No WKT is known for a bare UTM code
        assert!(!path.with_extension("prj").exists());
    }
}
