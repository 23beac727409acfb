//! KML output for zone collections

use std::collections::HashMap;
use std::path::Path;

use kml::types::{Geometry as KmlGeometry, Placemark, Polygon as KmlPolygon};
use kml::{Kml, KmlDocument, KmlVersion, KmlWriter};

use crate::error::Result;
use crate::zone::ZoneCollection;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// One placemark per zone, named after its band label.
pub fn zone_placemarks(zones: &ZoneCollection) -> Vec<Kml<f64>> {
    zones
        .iter()
        .map(|zone| {
            Kml::Placemark(Placemark {
                name: Some(zone.label().to_string()),
                description: Some(format!("{}-{} m", zone.inner(), zone.outer())),
                geometry: Some(KmlGeometry::Polygon(KmlPolygon::from(zone.geometry().clone()))),
                ..Default::default()
            })
        })
        .collect()
}

/// Write `zones` as a KML 2.2 document.
///
/// KML coordinates are longitude/latitude; the caller reprojects first.
pub fn write_kml<P: AsRef<Path>>(zones: &ZoneCollection, path: P) -> Result<()> {
    let mut attrs = HashMap::new();
    attrs.insert("xmlns".to_string(), KML_NAMESPACE.to_string());
    let document = Kml::KmlDocument(KmlDocument {
        version: KmlVersion::V22,
        attrs,
        elements: vec![Kml::Document {
            attrs: HashMap::new(),
            elements: zone_placemarks(zones),
        }],
    });

    let mut buf = Vec::new();
    KmlWriter::from_writer(&mut buf).write(&document)?;
    std::fs::write(path, buf)?;
    Ok(())
}
