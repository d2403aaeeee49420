//! Band math operations
//!
//! Element-wise algebra over one, two or many aligned rasters.
//!
//! Missing data always wins: if any input cell is nodata the output cell is
//! NaN. Arithmetic that yields a non-finite number (division by zero, 0/0,
//! overflow) also produces NaN instead of an error. Finite results are never
//! clamped. Outputs declare no sentinel; NaN is their only nodata encoding.

use crate::maybe_rayon::*;
use greencover_core::raster::{check_alignment, Raster};
use greencover_core::{Error, Result};

/// Binary operations for band math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Min,
    Max,
}

impl BandMathOp {
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BandMathOp::Add => a + b,
            BandMathOp::Subtract => a - b,
            BandMathOp::Multiply => a * b,
            BandMathOp::Divide => a / b,
            BandMathOp::Power => a.powf(b),
            BandMathOp::Min => a.min(b),
            BandMathOp::Max => a.max(b),
        }
    }
}

#[inline]
fn finite_or_nan(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        f64::NAN
    }
}

/// Apply a unary function to every present cell of a raster.
///
/// # Example
/// ```
/// use greencover_algorithms::imagery::band_math;
/// use greencover_core::Raster;
///
/// let dn = Raster::from_vec(vec![5000.0, 2500.0], 1, 2).unwrap();
/// let reflectance = band_math(&dn, |v| v * 0.0001).unwrap();
/// assert!((reflectance.get(0, 0).unwrap() - 0.5).abs() < 1e-12);
/// ```
pub fn band_math<F>(raster: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let rows = raster.rows();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            raster
                .data()
                .row(row)
                .iter()
                .map(|&v| {
                    if raster.is_nodata(v) {
                        f64::NAN
                    } else {
                        finite_or_nan(f(v))
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    raster.derive(data, None)
}

/// Apply a binary operation between two aligned rasters element-wise.
///
/// Fails with `MismatchedGeoreference` when shape, transform or CRS differ.
pub fn band_math_binary(a: &Raster<f64>, b: &Raster<f64>, op: BandMathOp) -> Result<Raster<f64>> {
    zip_cells(a, b, |va, vb| op.apply(va, vb))
}

/// Apply `f` to the present cells of two aligned rasters.
pub(crate) fn zip_cells<F>(a: &Raster<f64>, b: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    check_alignment(a, b)?;
    let rows = a.rows();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let ra = a.data().row(row);
            let rb = b.data().row(row);
            ra.iter()
                .zip(rb.iter())
                .map(|(&va, &vb)| {
                    if a.is_nodata(va) || b.is_nodata(vb) {
                        f64::NAN
                    } else {
                        finite_or_nan(f(va, vb))
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    a.derive(data, None)
}

/// Apply `f` across any number of aligned rasters.
///
/// `f` receives the present values of one cell position, in band order.
/// Fails with `Configuration` for an empty band list.
pub fn band_math_n<F>(bands: &[&Raster<f64>], f: F) -> Result<Raster<f64>>
where
    F: Fn(&[f64]) -> f64 + Sync + Send,
{
    let first = *bands
        .first()
        .ok_or_else(|| Error::Configuration("band math needs at least one band".into()))?;
    for band in &bands[1..] {
        check_alignment(first, *band)?;
    }

    let (rows, cols) = first.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut values = vec![0.0; bands.len()];
            let mut row_data = vec![f64::NAN; cols];
            'cells: for (col, out) in row_data.iter_mut().enumerate() {
                for (slot, band) in values.iter_mut().zip(bands) {
                    let v = band.data()[(row, col)];
                    if band.is_nodata(v) {
                        continue 'cells;
                    }
                    *slot = v;
                }
                *out = finite_or_nan(f(&values));
            }
            row_data
        })
        .collect();

    first.derive(data, None)
}
