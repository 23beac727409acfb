//! Coordinate Reference System handling

mod transform;

pub use transform::{reproject, Projection};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How coordinates of a CRS are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsKind {
    /// Angular units (longitude/latitude in degrees)
    Geographic,
    /// Linear units (metres)
    Projected,
    /// Not recognised; treated as unsafe for buffering
    Unknown,
}

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// WKT representation (primary)
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
    /// PROJ string if available
    proj: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
            proj: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
            proj: None,
        }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        Self {
            wkt: None,
            epsg: None,
            proj: Some(proj.into()),
        }
    }

    /// Parse an identifier such as `EPSG:31984`, `urn:ogc:def:crs:EPSG::4674`
    /// or `urn:ogc:def:crs:OGC:1.3:CRS84`.
    ///
    /// Anything that does not carry an EPSG code is kept as a PROJ string.
    pub fn parse(identifier: &str) -> Self {
        let id = identifier.trim();
        if id.eq_ignore_ascii_case("urn:ogc:def:crs:OGC:1.3:CRS84")
            || id.eq_ignore_ascii_case("CRS84")
        {
            return Self::wgs84();
        }
        let upper = id.to_ascii_uppercase();
        if let Some(pos) = upper.rfind("EPSG") {
            let code = upper[pos + 4..].trim_start_matches(':');
            if let Ok(code) = code.parse::<u32>() {
                return Self::from_epsg(code);
            }
        }
        Self::from_proj(id)
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// SIRGAS 2000 geographic CRS (EPSG:4674)
    pub fn sirgas2000() -> Self {
        Self::from_epsg(4674)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// WGS84 / UTM for the given zone and hemisphere (EPSG:326xx / 327xx)
    pub fn utm(zone: u32, north: bool) -> Self {
        let base = if north { 32600 } else { 32700 };
        Self::from_epsg(base + zone)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Get PROJ string
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// Classify the CRS by its units.
    ///
    /// EPSG codes are resolved through the supported projection table;
    /// WKT and PROJ strings are classified by their root keyword.
    pub fn kind(&self) -> CrsKind {
        if let Some(projection) = Projection::from_crs(self) {
            return if projection.is_geographic() {
                CrsKind::Geographic
            } else {
                CrsKind::Projected
            };
        }
        if let Some(wkt) = &self.wkt {
            let head = wkt.trim_start().to_ascii_uppercase();
            if head.starts_with("GEOGCS") || head.starts_with("GEOGCRS") {
                return CrsKind::Geographic;
            }
            if head.starts_with("PROJCS") || head.starts_with("PROJCRS") {
                return CrsKind::Projected;
            }
        }
        if let Some(proj) = &self.proj {
            if proj.contains("+proj=longlat") || proj.contains("+proj=latlong") {
                return CrsKind::Geographic;
            }
            if proj.contains("+units=m") {
                return CrsKind::Projected;
            }
        }
        CrsKind::Unknown
    }

    /// True when coordinates are longitude/latitude degrees.
    pub fn is_geographic(&self) -> bool {
        self.kind() == CrsKind::Geographic
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        // Simple check: if both have EPSG codes, compare them
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }

        // If both have WKT, compare (this is imperfect)
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }

        // If both have PROJ, compare
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }

        false
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(wkt) = &self.wkt {
            // Return first 50 chars of WKT
            return format!("WKT:{}", wkt.chars().take(50).collect::<String>());
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Fail unless `crs` measures distances in linear units.
///
/// Buffering in degrees is meaningless, so every distance operation calls
/// this first. Unrecognised systems are rejected as well.
pub fn require_linear(crs: &CRS) -> Result<()> {
    match crs.kind() {
        CrsKind::Projected => Ok(()),
        CrsKind::Geographic => Err(Error::NonLinearCrs(crs.identifier())),
        CrsKind::Unknown => Err(Error::NonLinearCrs(format!(
            "{} (units cannot be determined)",
            crs.identifier()
        ))),
    }
}

/// Fail unless both systems are equivalent.
pub fn require_same(a: &CRS, b: &CRS) -> Result<()> {
    if a.is_equivalent(b) {
        Ok(())
    } else {
        Err(Error::CrsMismatch(a.identifier(), b.identifier()))
    }
}
