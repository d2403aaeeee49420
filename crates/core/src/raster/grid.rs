//! Main Raster type

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Georeferenced, RasterElement};
use ndarray::{Array2, ArrayView2};

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in a row-major grid with its
/// affine transform, CRS identifier and optional nodata sentinel.
///
/// Operations in `greencover-algorithms` never modify a raster in place:
/// they borrow their inputs and return a new raster.
///
/// # Example
///
/// ```
/// use greencover_core::{Crs, GeoTransform, Raster};
///
/// let band = Raster::from_vec(vec![0.8, 0.6, 0.5, f64::NAN], 2, 2)
///     .unwrap()
///     .with_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0))
///     .with_crs(Some(Crs::from_epsg(32633)));
///
/// assert_eq!(band.value(0, 1).unwrap(), Some(0.6));
/// assert_eq!(band.value(1, 1).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<Crs>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from row-major samples
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_crs(mut self, crs: Option<Crs>) -> Self {
        self.crs = crs;
        self
    }

    pub fn with_nodata(mut self, nodata: Option<T>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Build a raster of another cell type from row-major data, sharing this
    /// raster's shape, transform and CRS.
    pub fn derive<U: RasterElement>(&self, data: Vec<U>, nodata: Option<U>) -> Result<Raster<U>> {
        let array = Array2::from_shape_vec(self.shape(), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Raster {
            data: array,
            transform: self.transform,
            crs: self.crs.clone(),
            nodata,
        })
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Raw value at (row, col), including nodata sentinels
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Value at (row, col), `None` when the cell is missing
    pub fn value(&self, row: usize, col: usize) -> Result<Option<T>> {
        let v = self.get(row, col)?;
        Ok(if self.is_nodata(v) { None } else { Some(v) })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Iterate every present (non-missing) value in row-major order
    pub fn valid_values(&self) -> impl Iterator<Item = T> + '_ {
        let nodata = self.nodata;
        self.data.iter().copied().filter(move |v| !v.is_nodata(nodata))
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// The value written into cells that become missing: the declared
    /// sentinel, or the type's default when none is declared.
    pub fn nodata_or_default(&self) -> T {
        self.nodata.unwrap_or_else(T::default_nodata)
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Pixel center coordinates
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    /// Area of one cell in squared CRS units
    pub fn cell_area(&self) -> f64 {
        self.transform.cell_area()
    }

    // Value checks

    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    /// Number of present cells
    pub fn valid_count(&self) -> usize {
        self.valid_values().count()
    }

    /// Cell-by-cell equality where two missing cells are equal regardless of
    /// the sentinel that encodes them. Shape, transform and CRS must match too.
    ///
    /// Derived `PartialEq` cannot express this for float grids because NaN
    /// never compares equal.
    pub fn equivalent(&self, other: &Raster<T>) -> bool {
        if crate::raster::check_alignment(self, other).is_err() {
            return false;
        }
        self.data.iter().zip(other.data.iter()).all(|(&a, &b)| {
            match (self.is_nodata(a), other.is_nodata(b)) {
                (true, true) => true,
                (false, false) => a == b,
                _ => false,
            }
        })
    }

    // Statistics

    /// Min, max and mean over present cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for value in self.valid_values() {
            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }
            if let Some(v) = value.to_f64() {
                sum += v;
            }
            count += 1;
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

impl<T: RasterElement> Georeferenced for Raster<T> {
    fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
