//! GeoJSON reading and writing

use geojson::{feature::Id, FeatureCollection as GeoJsonCollection, GeoJson, JsonObject, JsonValue};
use std::path::Path;

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Boundary, Feature, FeatureCollection};
use crate::zone::ZoneCollection;

/// Read a GeoJSON file (FeatureCollection, Feature or bare Geometry).
///
/// The CRS comes from the legacy `crs` member when present and defaults to
/// EPSG:4326 as RFC 7946 prescribes.
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let fail = |reason: String| Error::SourceRead {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    parse_features(&text).map_err(fail)
}

/// Read a boundary layer and dissolve it into one region.
///
/// With `filter = Some((key, value))` only features whose attribute `key`
/// equals `value` are kept, e.g. `("SIGLA_UF", "AL")` to pick one state out
/// of a national layer.
pub fn load_boundary<P: AsRef<Path>>(path: P, filter: Option<(&str, &str)>) -> Result<Boundary> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let fail = |reason: String| Error::BoundaryRead {
        source_name: source_name.clone(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let features = parse_features(&text).map_err(fail)?;

    let selected = match filter {
        Some((key, value)) => {
            let subset = features.filter_by_property(key, value);
            if subset.is_empty() {
                return Err(fail(format!("no feature with {} = {}", key, value)));
            }
            subset
        }
        None => features,
    };
    Boundary::from_features(&selected, &source_name)
}

/// Parse GeoJSON text into a CRS-tagged feature collection.
pub fn parse_features(text: &str) -> std::result::Result<FeatureCollection, String> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| e.to_string())?;

    match geojson {
        GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(legacy_crs)
                .unwrap_or_else(CRS::wgs84);
            let features = fc
                .features
                .into_iter()
                .enumerate()
                .map(|(i, f)| convert_feature(f).map_err(|e| format!("feature {}: {}", i, e)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(FeatureCollection::with_features(features, crs))
        }
        GeoJson::Feature(f) => {
            let crs = f
                .foreign_members
                .as_ref()
                .and_then(legacy_crs)
                .unwrap_or_else(CRS::wgs84);
            let feature = convert_feature(f)?;
            Ok(FeatureCollection::with_features(vec![feature], crs))
        }
        GeoJson::Geometry(g) => {
            let crs = g
                .foreign_members
                .as_ref()
                .and_then(legacy_crs)
                .unwrap_or_else(CRS::wgs84);
            let geometry = geo_types::Geometry::<f64>::try_from(g).map_err(|e| e.to_string())?;
            Ok(FeatureCollection::from_geometries(vec![geometry], crs))
        }
    }
}

fn convert_feature(f: geojson::Feature) -> std::result::Result<Feature, String> {
    let geometry = match f.geometry {
        Some(g) => Some(geo_types::Geometry::<f64>::try_from(g).map_err(|e| e.to_string())?),
        None => None,
    };
    let mut feature = match geometry {
        Some(g) => Feature::new(g),
        None => Feature::empty(),
    };
    feature.id = f.id.map(|id| match id {
        Id::String(s) => s,
        Id::Number(n) => n.to_string(),
    });
    if let Some(props) = f.properties {
        for (key, value) in props {
            feature.set_property(key, attribute_value(value));
        }
    }
    Ok(feature)
}

fn attribute_value(value: JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(b) => AttributeValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => AttributeValue::String(s),
        other => AttributeValue::String(other.to_string()),
    }
}

/// `{"crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4674"}}}`
fn legacy_crs(members: &JsonObject) -> Option<CRS> {
    let name = members
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;
    Some(CRS::parse(name))
}

/// One GeoJSON feature per zone with `zone`, `inner_m` and `outer_m`
/// properties, in collection order.
pub fn zone_features(zones: &ZoneCollection) -> Vec<geojson::Feature> {
    zones
        .iter()
        .map(|zone| {
            let mut properties = JsonObject::new();
            properties.insert("zone".to_string(), JsonValue::from(zone.label()));
            properties.insert("inner_m".to_string(), JsonValue::from(zone.inner()));
            properties.insert("outer_m".to_string(), JsonValue::from(zone.outer()));
            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(zone.geometry()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect()
}

/// Write features as a GeoJSON FeatureCollection.
///
/// Systems other than EPSG:4326 are recorded in a legacy `crs` member so the
/// file reads back with the right CRS.
pub fn write_feature_collection<P: AsRef<Path>>(
    features: Vec<geojson::Feature>,
    crs: &CRS,
    path: P,
) -> Result<()> {
    let foreign_members = if crs.epsg() == Some(4326) {
        None
    } else {
        let mut members = JsonObject::new();
        members.insert(
            "crs".to_string(),
            serde_json::json!({
                "type": "name",
                "properties": { "name": crs.identifier() }
            }),
        );
        Some(members)
    };
    let collection = GeoJsonCollection {
        bbox: None,
        features,
        foreign_members,
    };
    let text = serde_json::to_string(&collection)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{BandSpec, Zone};
    use geo_types::{Geometry, LineString, Polygon};

    const COAST: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4674"}},
        "features": [
            {"type": "Feature", "id": 7,
             "properties": {"name": "praia", "length": 1.5, "segments": 2, "surveyed": true},
             "geometry": {"type": "LineString", "coordinates": [[-35.7, -9.6], [-35.8, -9.7]]}},
            {"type": "Feature", "properties": null, "geometry": null}
        ]
    }"#;

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"SIGLA_UF": "AL"},
             "geometry": {"type": "Polygon", "coordinates": [[[-36,-10],[-35,-10],[-35,-9],[-36,-9],[-36,-10]]]}},
            {"type": "Feature", "properties": {"SIGLA_UF": "PE"},
             "geometry": {"type": "Polygon", "coordinates": [[[-36,-9],[-35,-9],[-35,-8],[-36,-8],[-36,-9]]]}}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection_with_legacy_crs() {
        let fc = parse_features(COAST).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.crs().epsg(), Some(4674));

        let first = &fc.features[0];
        assert_eq!(first.id.as_deref(), Some("7"));
        assert_eq!(first.get_property("name"), Some(&AttributeValue::String("praia".into())));
        assert_eq!(first.get_property("length"), Some(&AttributeValue::Float(1.5)));
        assert_eq!(first.get_property("segments"), Some(&AttributeValue::Int(2)));
        assert_eq!(first.get_property("surveyed"), Some(&AttributeValue::Bool(true)));
        assert!(matches!(first.geometry, Some(Geometry::LineString(_))));
        assert!(fc.features[1].geometry.is_none());
    }

    #[test]
    fn test_parse_bare_geometry_defaults_to_wgs84() {
        let fc = parse_features(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.crs().epsg(), Some(4326));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_features("{ not json").is_err());
    }

    #[test]
    fn test_load_features_missing_file() {
        let err = load_features("/definitely/not/here.geojson").unwrap_err();
        assert!(matches!(err, Error::SourceRead { .. }));
    }

    #[test]
    fn test_load_boundary_with_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.geojson");
        std::fs::write(&path, STATES).unwrap();

        let boundary = load_boundary(&path, Some(("SIGLA_UF", "AL"))).unwrap();
        let rect = boundary.bounding_rect().unwrap();
        assert_eq!(rect.min().y, -10.0);
        assert_eq!(rect.max().y, -9.0);

        let both = load_boundary(&path, None).unwrap();
        assert_eq!(both.bounding_rect().unwrap().max().y, -8.0);

        let err = load_boundary(&path, Some(("SIGLA_UF", "SP"))).unwrap_err();
        assert!(matches!(err, Error::BoundaryRead { reason, .. } if reason.contains("SP")));
    }

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
    fn test_zone_features_properties() {
        let features = zone_features(&sample_zones());
        assert_eq!(features.len(), 1);
        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(props["zone"], JsonValue::from("C5"));
        assert_eq!(props["outer_m"], JsonValue::from(2000.0));
    }
}
