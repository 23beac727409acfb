//! Pure-Rust reprojection between geographic, UTM and Web Mercator systems
//! (Snyder 1987, USGS formulas).
//!
//! Every transform goes through a longitude/latitude pivot. SIRGAS 2000 is
//! treated as coincident with WGS84; the datums differ by centimetres, well
//! below the tolerance of distance bands measured in kilometres.

use geo::{Coord, MapCoords};

use super::CRS;
use crate::error::{Error, Result};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A supported coordinate system, resolved from a [`CRS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Longitude/latitude in degrees
    Geographic,
    /// Transverse Mercator zone in metres
    Utm { zone: u32, north: bool },
    /// Spherical Mercator (EPSG:3857) in metres
    WebMercator,
}

impl Projection {
    /// Resolve a CRS into a supported projection, or `None`.
    pub fn from_crs(crs: &CRS) -> Option<Self> {
        if let Some(code) = crs.epsg() {
            return Self::from_epsg(code);
        }
        crs.proj().and_then(Self::from_proj_string)
    }

    fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 | 4674 => Some(Projection::Geographic),
            3857 => Some(Projection::WebMercator),
            32601..=32660 => Some(Projection::Utm { zone: code - 32600, north: true }),
            32701..=32760 => Some(Projection::Utm { zone: code - 32700, north: false }),
            // SIRGAS 2000 / UTM 11N..22N
            31965..=31976 => Some(Projection::Utm { zone: code - 31954, north: true }),
            // SIRGAS 2000 / UTM 17S..25S
            31977..=31985 => Some(Projection::Utm { zone: code - 31960, north: false }),
            _ => None,
        }
    }

    fn from_proj_string(proj: &str) -> Option<Self> {
        let mut kind = None;
        let mut zone = None;
        let mut south = false;
        for token in proj.split_whitespace() {
            match token.trim_start_matches('+') {
                "proj=longlat" | "proj=latlong" => kind = Some("longlat"),
                "proj=utm" => kind = Some("utm"),
                "south" => south = true,
                other => {
                    if let Some(z) = other.strip_prefix("zone=") {
                        zone = z.parse::<u32>().ok();
                    }
                }
            }
        }
        match (kind?, zone) {
            ("longlat", _) => Some(Projection::Geographic),
            ("utm", Some(z)) if (1..=60).contains(&z) => Some(Projection::Utm {
                zone: z,
                north: !south,
            }),
            _ => None,
        }
    }

    /// True for longitude/latitude systems.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Projection::Geographic)
    }

    /// Project (x, y) in this system to (longitude, latitude) degrees.
    pub fn to_lonlat(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (x, y),
            Projection::Utm { zone, north } => utm_to_wgs84(x, y, zone, north),
            Projection::WebMercator => mercator_to_wgs84(x, y),
        }
    }

    /// Project (longitude, latitude) degrees into this system.
    pub fn from_lonlat(&self, lon: f64, lat: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (lon, lat),
            Projection::Utm { zone, north } => wgs84_to_utm(lon, lat, zone, north),
            Projection::WebMercator => wgs84_to_mercator(lon, lat),
        }
    }
}

/// Reproject any `geo` geometry from one CRS to another.
///
/// Equivalent systems return a clone. Topology is untouched: every vertex
/// is transformed independently and nothing is re-snapped.
pub fn reproject<G>(geometry: &G, from: &CRS, to: &CRS) -> Result<G>
where
    G: MapCoords<f64, f64, Output = G> + Clone,
{
    if from.is_equivalent(to) {
        return Ok(geometry.clone());
    }
    let src = Projection::from_crs(from).ok_or_else(|| Error::UnsupportedCrs(from.identifier()))?;
    let dst = Projection::from_crs(to).ok_or_else(|| Error::UnsupportedCrs(to.identifier()))?;
    if src == dst {
        return Ok(geometry.clone());
    }

    Ok(geometry.map_coords(move |c: Coord<f64>| {
        let (lon, lat) = src.to_lonlat(c.x, c.y);
        let (x, y) = dst.from_lonlat(lon, lat);
        Coord { x, y }
    }))
}

// ── Transverse Mercator (Snyder 1987, USGS Prof. Paper 1395, pp. 61-64) ─

fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = central_meridian(zone);

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);

    // Meridional arc length M (Snyder eq. 3-21)
    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Easting (Snyder eq. 8-9)
    let easting = K0 * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a_coeff / 120.0)
        + FALSE_EASTING;

    // Northing (Snyder eq. 8-10)
    let northing = K0
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    let northing = if north {
        northing
    } else {
        northing + FALSE_NORTHING_SOUTH
    };

    (easting, northing)
}

/// Convert UTM (easting, northing) in metres back to WGS84 degrees.
/// Snyder eqs. 8-12 to 8-25, via the footpoint latitude.
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1_e2 = (1.0 - E2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    // Footpoint latitude (Snyder eq. 3-26)
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - E2 * sin_phi1 * sin_phi1;
    let n1 = A / denom.sqrt();
    let r1 = A * (1.0 - E2) / denom.powf(1.5);
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

/// Meridional arc from equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e2 = E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

// ── Web Mercator (spherical, radius = WGS84 semi-major axis) ────────────

fn wgs84_to_mercator(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = A * lon_deg.to_radians();
    let y = A * (std::f64::consts::FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / A).to_degrees();
    let lat = (2.0 * (y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}
