//! Polygon to raster scan conversion
//!
//! A cell is inside when its center lies inside the polygon under the
//! even-odd rule over all rings, so holes subtract coverage.
//!
//! Each row is handled independently:
//! 1. take the y of the row's pixel centers,
//! 2. intersect that horizontal line with every non-horizontal edge,
//!    counting an edge only when `y_min <= y < y_max`,
//! 3. sort the crossings and pair them left to right into spans `[x0, x1)`,
//! 4. mark every pixel center inside a span.
//!
//! The half-open edge test counts a vertex lying exactly on the scanline once
//! (via the edge leaving it upwards) and never twice.

use crate::maybe_rayon::*;
use greencover_core::raster::{check_crs, GeoTransform, Georeferenced, Mask};
use greencover_core::vector::{Boundary, Polygon};
use greencover_core::{Error, Result};

/// A non-horizontal polygon edge
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    y_min: f64,
    y_max: f64,
}

impl Edge {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Self> {
        // Horizontal and zero-length edges never cross a scanline
        if y0 == y1 {
            return None;
        }
        Some(Self {
            x0,
            y0,
            x1,
            y1,
            y_min: y0.min(y1),
            y_max: y0.max(y1),
        })
    }

    #[inline]
    fn crossing(&self, y: f64) -> Option<f64> {
        if y >= self.y_min && y < self.y_max {
            Some(self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0))
        } else {
            None
        }
    }
}

/// Rasterize one polygon onto the pixel grid of `template`.
///
/// The output mask has the template's shape, transform and CRS. When the
/// polygon carries a CRS it must equal the template's, otherwise
/// `MismatchedGeoreference` is returned. A polygon without CRS is taken to be
/// in the template's CRS already.
///
/// # Example
/// ```
/// use greencover_algorithms::vector::rasterize;
/// use greencover_core::{GeoTransform, Polygon, Raster};
///
/// let grid = Raster::<f64>::new(3, 3).with_transform(GeoTransform::new(0.0, 3.0, 1.0, -1.0));
/// let square = Polygon::rect(0.0, 1.0, 2.0, 3.0).unwrap();
/// let mask = rasterize(&square, &grid).unwrap();
/// assert_eq!(mask.count_inside(), 4);
/// ```
pub fn rasterize<G>(polygon: &Polygon, template: &G) -> Result<Mask>
where
    G: Georeferenced + ?Sized,
{
    if polygon.crs().is_some() {
        check_crs(polygon.crs(), template.crs())?;
    }

    let (rows, cols) = template.shape();
    let transform = *template.transform();
    check_transform(&transform)?;
    let edges: Vec<Edge> = polygon
        .edges()
        .filter_map(|(a, b)| Edge::new(a.x, a.y, b.x, b.y))
        .collect();

    let mut flags = vec![false; rows * cols];
    if cols > 0 {
        flags
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| fill_row(&edges, &transform, row, out));
    }

    Mask::from_vec(template, flags)
}

/// Rasterize every part of a boundary and return the union of their masks.
pub fn rasterize_boundary<G>(boundary: &Boundary, template: &G) -> Result<Mask>
where
    G: Georeferenced + ?Sized,
{
    let mut mask = Mask::like(template, false);
    for part in boundary.parts() {
        mask = mask.union(&rasterize(part, template)?)?;
    }
    Ok(mask)
}

/// Pixel sizes must be finite and non-zero for pixel centers to be distinct.
fn check_transform(t: &GeoTransform) -> Result<()> {
    let usable = |v: f64| v.is_finite() && v != 0.0;
    if !(usable(t.pixel_width) && usable(t.pixel_height))
        || !t.origin_x.is_finite()
        || !t.origin_y.is_finite()
    {
        return Err(Error::Configuration(format!(
            "cannot rasterize onto degenerate transform {}",
            t
        )));
    }
    Ok(())
}

fn fill_row(edges: &[Edge], transform: &GeoTransform, row: usize, out: &mut [bool]) {
    let y = transform.row_center_y(row);

    let mut crossings: Vec<f64> = edges.iter().filter_map(|e| e.crossing(y)).collect();
    if crossings.len() < 2 {
        return;
    }
    crossings.sort_by(f64::total_cmp);

    for span in crossings.chunks_exact(2) {
        mark_span(span[0], span[1], transform, out);
    }
}

/// Mark columns whose center x satisfies `left <= x < right`.
fn mark_span(left: f64, right: f64, transform: &GeoTransform, out: &mut [bool]) {
    let cols = out.len() as i64;

    // Candidate column range from the inverse transform, widened by one so
    // the exact comparison below decides boundary cells.
    let fa = (left - transform.origin_x) / transform.pixel_width - 0.5;
    let fb = (right - transform.origin_x) / transform.pixel_width - 0.5;
    let lo = (fa.min(fb).floor() as i64 - 1).clamp(0, cols) as usize;
    let hi = (fa.max(fb).ceil() as i64 + 1).clamp(0, cols) as usize;

    for (col, cell) in out.iter_mut().enumerate().take(hi).skip(lo) {
        let x = transform.col_center_x(col);
        if x >= left && x < right {
            *cell = true;
        }
    }
}
