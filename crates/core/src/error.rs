//! Error types for corrozone

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for corrozone operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid geometry ({context}): {reason}")]
    InvalidGeometry { context: String, reason: String },

    #[error("Invalid band '{label}': {reason}")]
    InvalidBand { label: String, reason: String },

    #[error("CRS {0} is not a linear (metric) projection; buffering requires metres")]
    NonLinearCrs(String),

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Unsupported CRS for reprojection: {0}")]
    UnsupportedCrs(String),

    #[error("Failed to read source {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    #[error("Failed to read boundary {source_name}: {reason}")]
    BoundaryRead { source_name: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("KML error: {0}")]
    Kml(#[from] kml::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn invalid_geometry(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidGeometry {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for corrozone operations
pub type Result<T> = std::result::Result<T, Error>;
