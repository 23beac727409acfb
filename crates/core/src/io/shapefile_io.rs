//! ESRI shapefile output for zone collections
//!
//! Geometry and dBase attributes go through the `shapefile` crate. The `.prj`
//! sidecar is written for the geographic systems zones are usually exported
//! in, and for any CRS carrying its own WKT.

use std::path::Path;

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Polygon as ShpPolygon, Writer};

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::zone::ZoneCollection;

const LABEL_WIDTH: u8 = 80;
const DISTANCE_WIDTH: u8 = 18;
const DISTANCE_DECIMALS: u8 = 3;

const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
const SIRGAS2000_WKT: &str = r#"GEOGCS["GCS_SIRGAS_2000",DATUM["D_SIRGAS_2000",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name)
        .map_err(|e| Error::Other(format!("invalid dBase field name {}: {:?}", name, e)))
}

/// WKT for the `.prj` sidecar, when known.
fn projection_wkt(crs: &CRS) -> Option<&str> {
    match crs.epsg() {
        Some(4326) => Some(WGS84_WKT),
        Some(4674) => Some(SIRGAS2000_WKT),
        _ => crs.wkt(),
    }
}

/// Write `zones` as a polygon shapefile with `zone`, `inner_m` and
/// `outer_m` attributes.
///
/// `path` names the `.shp` file; `.shx`, `.dbf` and `.prj` land next to it.
pub fn write_shapefile<P: AsRef<Path>>(zones: &ZoneCollection, crs: &CRS, path: P) -> Result<()> {
    let path = path.as_ref();
    let table = TableWriterBuilder::new()
        .add_character_field(field_name("zone")?, LABEL_WIDTH)
        .add_numeric_field(field_name("inner_m")?, DISTANCE_WIDTH, DISTANCE_DECIMALS)
        .add_numeric_field(field_name("outer_m")?, DISTANCE_WIDTH, DISTANCE_DECIMALS);

    {
        let mut writer = Writer::from_path(path, table)?;
        for zone in zones.iter() {
            let shape = ShpPolygon::from(zone.geometry().clone());
            let mut record = Record::default();
            record.insert(
                "zone".to_string(),
                FieldValue::Character(Some(zone.label().to_string())),
            );
            record.insert("inner_m".to_string(), FieldValue::Numeric(Some(zone.inner())));
            record.insert("outer_m".to_string(), FieldValue::Numeric(Some(zone.outer())));
            writer.write_shape_and_record(&shape, &record)?;
        }
    }

    if let Some(wkt) = projection_wkt(crs) {
        std::fs::write(path.with_extension("prj"), wkt)?;
    }
    Ok(())
}
