//! Boolean area-of-interest masks

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Georeferenced};
use ndarray::{Array2, ArrayView2, Zip};

/// A georeferenced boolean grid; `true` marks cells inside the area of interest.
///
/// Masks have no nodata: every cell is either inside or outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Array2<bool>,
    transform: GeoTransform,
    crs: Option<Crs>,
}

impl Mask {
    /// A mask with every cell set to `inside`, laid out like `template`
    pub fn like<G: Georeferenced + ?Sized>(template: &G, inside: bool) -> Self {
        Self {
            data: Array2::from_elem(template.shape(), inside),
            transform: *template.transform(),
            crs: template.crs().cloned(),
        }
    }

    /// Build from row-major flags laid out like `template`
    pub fn from_vec<G: Georeferenced + ?Sized>(template: &G, flags: Vec<bool>) -> Result<Self> {
        let (rows, cols) = template.shape();
        if flags.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let data = Array2::from_shape_vec((rows, cols), flags)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self {
            data,
            transform: *template.transform(),
            crs: template.crs().cloned(),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_inside(&self, row: usize, col: usize) -> Result<bool> {
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

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.data.view()
    }

    /// Number of cells inside
    pub fn count_inside(&self) -> usize {
        self.data.iter().filter(|&&inside| inside).count()
    }

    /// Cell-wise OR of two aligned masks
    pub fn union(&self, other: &Mask) -> Result<Mask> {
        crate::raster::check_alignment(self, other)?;
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|&a, &b| a || b);
        Ok(Self {
            data,
            transform: self.transform,
            crs: self.crs.clone(),
        })
    }
}

impl Georeferenced for Mask {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Raster;

    #[test]
    fn test_like_and_count() {
        let template = Raster::<f64>::new(3, 4);
        let mask = Mask::like(&template, true);
        assert_eq!(mask.count_inside(), 12);
        assert!(mask.is_inside(2, 3).unwrap());
        assert!(mask.is_inside(3, 0).is_err());
    }

    #[test]
    fn test_union() {
        let template = Raster::<f64>::new(1, 3);
        let a = Mask::from_vec(&template, vec![true, false, false]).unwrap();
        let b = Mask::from_vec(&template, vec![false, false, true]).unwrap();
        let u = a.union(&b).unwrap();
        assert_eq!(u.view().iter().copied().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn test_union_rejects_misaligned() {
        let a = Mask::like(&Raster::<f64>::new(2, 2), false);
        let b = Mask::like(&Raster::<f64>::new(2, 3), false);
        assert!(matches!(
            a.union(&b),
            Err(Error::MismatchedGeoreference { .. })
        ));
    }
}
