//! Raster data structures

mod align;
mod element;
mod geotransform;
mod grid;
mod mask;

pub use align::{check_alignment, check_crs, Georeferenced};
pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use mask::Mask;
