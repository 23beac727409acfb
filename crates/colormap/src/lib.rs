//! # Corrozone Colormap
//!
//! Colors, styled features and map views for distance zones.
//!
//! A zone's color comes from a static label → color table ([`ZonePalette`]).
//! [`styled_features`] turns a zone collection into simplestyle GeoJSON and
//! [`MapView`] carries center, zoom, extent and legend for a viewer.
//!
//! ## Usage
//!
//! ```ignore
//! use corrozone_colormap::{MapView, ZonePalette, DEFAULT_ZOOM};
//!
//! let palette = ZonePalette::for_bands(&bands, &[]);
//! let view = MapView::from_zones(&zones, &bands, &palette, DEFAULT_ZOOM)?;
//! ```

mod scheme;
mod render;

pub use scheme::{evaluate, ColorStop, Rgb, ZonePalette};
pub use render::{styled_features, LatLon, LegendEntry, MapView, DEFAULT_BASEMAP, DEFAULT_ZOOM};
