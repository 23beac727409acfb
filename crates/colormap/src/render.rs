//! Styled zone features and the map view handed to a viewer.

use crate::scheme::{Rgb, ZonePalette};
use corrozone_core::io::zone_features;
use corrozone_core::{BandSet, Result, ZoneCollection, CRS};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Default initial zoom of the map view
pub const DEFAULT_ZOOM: u8 = 9;
/// Default basemap tile set
pub const DEFAULT_BASEMAP: &str = "cartodbpositron";

const FILL_OPACITY: f64 = 0.5;
const STROKE_WIDTH: f64 = 1.0;

/// GeoJSON features for `zones` carrying simplestyle properties
/// (`fill`, `stroke`, `fill-opacity`, `stroke-width`) from `palette`.
///
/// Coordinates are written as given; reproject to a geographic CRS first.
pub fn styled_features(zones: &ZoneCollection, palette: &ZonePalette) -> Vec<geojson::Feature> {
    zone_features(zones)
        .into_iter()
        .zip(zones.iter())
        .map(|(mut feature, zone)| {
            let color = palette.color_for(zone.label()).hex();
            let properties = feature.properties.get_or_insert_with(Default::default);
            properties.insert("fill".to_string(), JsonValue::from(color.clone()));
            properties.insert("stroke".to_string(), JsonValue::from(color));
            properties.insert("fill-opacity".to_string(), JsonValue::from(FILL_OPACITY));
            properties.insert("stroke-width".to_string(), JsonValue::from(STROKE_WIDTH));
            feature
        })
        .collect()
}

/// Map center in geographic degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// One line of the map legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub inner_km: f64,
    pub outer_km: f64,
}

impl LegendEntry {
    /// Legend text, e.g. `C5 - Muito Alta (0-2km)`.
    pub fn text(&self) -> String {
        format!("{} ({}-{}km)", self.label, self.inner_km, self.outer_km)
    }
}

/// Everything a viewer needs to show a zone collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub title: String,
    /// Midpoint of the zone extent; `None` when there are no zones
    pub center: Option<LatLon>,
    pub zoom: u8,
    /// `[[south, west], [north, east]]`
    pub bounds: Option<[[f64; 2]; 2]>,
    pub basemap: String,
    pub legend: Vec<LegendEntry>,
}

impl MapView {
    /// Build the view for `zones`, reprojecting to WGS 84 when needed.
    ///
    /// The legend lists every band of `bands` in order, including bands that
    /// produced no zone.
    pub fn from_zones(
        zones: &ZoneCollection,
        bands: &BandSet,
        palette: &ZonePalette,
        zoom: u8,
    ) -> Result<Self> {
        let geographic;
        let zones = if zones.crs().is_geographic() {
            zones
        } else {
            geographic = zones.reproject(&CRS::wgs84())?;
            &geographic
        };

        let bounds = zones.bounds();
        let center = bounds.map(|b| LatLon {
            lat: (b.min().y + b.max().y) / 2.0,
            lon: (b.min().x + b.max().x) / 2.0,
        });

        let legend = bands
            .iter()
            .map(|band| LegendEntry {
                label: band.label().to_string(),
                color: palette.color_for(band.label()),
                inner_km: band.inner() / 1000.0,
                outer_km: band.outer() / 1000.0,
            })
            .collect();

        Ok(Self {
            title: "Zonas de Corrosão".to_string(),
            center,
            zoom,
            bounds: bounds.map(|b| [[b.min().y, b.min().x], [b.max().y, b.max().x]]),
            basemap: DEFAULT_BASEMAP.to_string(),
            legend,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
