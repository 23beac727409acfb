//! # Corrozone Core
//!
//! Core types, coordinate systems and I/O for coastal distance zoning.
//!
//! This crate provides:
//! - `CRS`: Coordinate Reference System handling and pure-Rust reprojection
//! - `FeatureCollection` / `Boundary`: CRS-tagged vector inputs
//! - `BandSpec` / `Zone` / `ZoneCollection`: the zoning data model
//! - Algorithm traits for consistent API
//! - GeoJSON input and GeoJSON, KML and shapefile export

pub mod crs;
pub mod error;
pub mod io;
pub mod vector;
pub mod zone;

pub use crs::{require_linear, CrsKind, CRS};
pub use error::{Error, Result};
pub use vector::{AttributeValue, Boundary, Feature, FeatureCollection};
pub use zone::{BandSet, BandSpec, Zone, ZoneCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{require_linear, CrsKind, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::vector::{Boundary, Feature, FeatureCollection};
    pub use crate::zone::{BandSet, BandSpec, Zone, ZoneCollection};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in corrozone.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
