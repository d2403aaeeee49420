//! Vector to raster conversion
//!
//! - Rasterize: scan-convert area-of-interest polygons into aligned masks

mod rasterize;

pub use rasterize::{rasterize, rasterize_boundary};
