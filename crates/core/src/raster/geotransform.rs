//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned affine transform between pixel and map coordinates.
///
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
///
/// Rotation terms are not supported. For north-up images `pixel_height`
/// is negative and the origin is the upper-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        (self.col_center_x(col), self.row_center_y(row))
    }

    /// X coordinate of the center of column `col`
    #[inline]
    pub fn col_center_x(&self, col: usize) -> f64 {
        self.origin_x + (col as f64 + 0.5) * self.pixel_width
    }

    /// Y coordinate of the center of row `row`
    #[inline]
    pub fn row_center_y(&self, row: usize) -> f64 {
        self.origin_y + (row as f64 + 0.5) * self.pixel_height
    }

    /// Coordinates of the pixel's top-left corner
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.pixel_width,
            self.origin_y + row as f64 * self.pixel_height,
        )
    }

    /// Convert geographic coordinates to fractional pixel coordinates (col, row).
    ///
    /// Returns NaN for a degenerate transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return (f64::NAN, f64::NAN);
        }
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Area of one cell in squared CRS units
    pub fn cell_area(&self) -> f64 {
        (self.pixel_width * self.pixel_height).abs()
    }

    pub fn is_north_up(&self) -> bool {
        self.pixel_width > 0.0 && self.pixel_height < 0.0
    }

    /// Bounding box (min_x, min_y, max_x, max_y) for a raster of given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(width, height);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin=({}, {}) pixel=({}, {})",
            self.origin_x, self.origin_y, self.pixel_width, self.pixel_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);
        assert_relative_eq!(x, 155.0, epsilon = 1e-10);
        assert_relative_eq!(y, 95.0, epsilon = 1e-10);

        let (col, row) = gt.geo_to_pixel(x, y);
        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cell_area_and_orientation() {
        let gt = GeoTransform::new(500_000.0, 4_200_000.0, 10.0, -10.0);
        assert_relative_eq!(gt.cell_area(), 100.0);
        assert!(gt.is_north_up());
        assert!(!GeoTransform::new(0.0, 0.0, 1.0, 1.0).is_north_up());
    }

    #[test]
    fn test_degenerate_inverse() {
        let gt = GeoTransform::new(0.0, 0.0, 0.0, -1.0);
        let (c, r) = gt.geo_to_pixel(1.0, 1.0);
        assert!(c.is_nan() && r.is_nan());
    }
}
