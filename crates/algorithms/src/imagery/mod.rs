//! Imagery analysis algorithms
//!
//! - Band math: element-wise algebra with nodata propagation
//! - Spectral index: NDVI and the generic normalized difference
//! - Mask: restrict a band to an area of interest
//! - Classify: threshold classification into labeled categories

mod band_math;
mod classify;
mod indices;
mod mask;

pub use band_math::{band_math, band_math_binary, band_math_n, BandMathOp};
pub use classify::{classify, ClassificationScheme, Classified, UNCLASSIFIED, UNCLASSIFIED_LABEL};
pub use indices::{ndvi, normalized_difference};
pub use mask::apply_mask;
