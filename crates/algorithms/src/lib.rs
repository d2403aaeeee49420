//! # Greencover Algorithms
//!
//! Geoprocessing for vegetation cover analysis.
//!
//! ## Algorithm Categories
//!
//! - **vector**: polygon scan conversion into area-of-interest masks
//! - **imagery**: band math, NDVI, masking, threshold classification
//! - **statistics**: land cover summaries
//! - **pipeline**: the full boundary → NDVI → summary workflow

mod maybe_rayon;

pub mod imagery;
pub mod pipeline;
pub mod statistics;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        apply_mask, band_math, band_math_binary, band_math_n, classify, ndvi,
        normalized_difference, BandMathOp, ClassificationScheme, Classified, UNCLASSIFIED,
    };
    pub use crate::pipeline::{VegetationPipeline, VegetationReport};
    pub use crate::statistics::{summarize, CategoryStat, LandCoverSummary};
    pub use crate::vector::{rasterize, rasterize_boundary};
    pub use greencover_core::prelude::*;
}
