//! Spectral vegetation index

use super::band_math::zip_cells;
use greencover_core::raster::Raster;
use greencover_core::Result;

/// Compute the normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Cells where either band is nodata, or where the two bands sum to exactly
/// zero, are NaN. For nonnegative inputs the result lies in [-1, 1]; values
/// outside that range (from negative reflectances) are returned as computed.
pub fn normalized_difference(band_a: &Raster<f64>, band_b: &Raster<f64>) -> Result<Raster<f64>> {
    zip_cells(band_a, band_b, |a, b| {
        let sum = a + b;
        if sum == 0.0 {
            f64::NAN
        } else {
            (a - b) / sum
        }
    })
}

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red)`
///
/// Typical values:
/// - Dense vegetation: 0.6 to 0.9
/// - Sparse vegetation: 0.2 to 0.5
/// - Bare soil: 0.1 to 0.2
/// - Water/clouds: -1.0 to 0.0
pub fn ndvi(nir: &Raster<f64>, red: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(nir, red)
}
