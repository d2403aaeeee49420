//! # Greencover Core
//!
//! Core data model for vegetation cover analysis.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced grid with an explicit nodata sentinel
//! - `Mask`: boolean area-of-interest grid
//! - `GeoTransform`: affine transform for georeferencing
//! - `Crs`: coordinate reference identifier, compared for equality only
//! - `Polygon` / `Boundary`: area-of-interest geometry

pub mod crs;
pub mod error;
pub mod raster;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{check_alignment, GeoTransform, Georeferenced, Mask, Raster, RasterElement};
pub use vector::{Boundary, Polygon};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{check_alignment, GeoTransform, Georeferenced, Mask, Raster, RasterElement};
    pub use crate::vector::{Boundary, Polygon};
}
