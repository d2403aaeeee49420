//! Land cover summary
//!
//! Tallies a classified raster into per-category pixel counts and fractions.
//! Rows are counted independently and their histograms added together, so
//! the result does not depend on how rows were split between threads.

use crate::imagery::{Classified, ClassificationScheme, UNCLASSIFIED};
use crate::maybe_rayon::*;
use greencover_core::{Error, Result};
use serde::Serialize;

/// Count, share and area of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub code: i32,
    pub label: String,
    /// Number of cells in this category
    pub count: usize,
    /// `count / total_valid`, or 0 when there are no valid cells
    pub fraction: f64,
    /// Covered area in squared CRS units
    pub area: f64,
}

/// Per-category breakdown of a classified raster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandCoverSummary {
    /// One entry per category of the scheme, in code order
    pub categories: Vec<CategoryStat>,
    /// Cells with a valid value (sum of all category counts)
    pub total_valid: usize,
    /// Cells that were nodata before classification
    pub unclassified: usize,
    /// Area of one cell in squared CRS units
    pub cell_area: f64,
}

impl LandCoverSummary {
    pub fn get(&self, label: &str) -> Option<&CategoryStat> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn count(&self, label: &str) -> usize {
        self.get(label).map_or(0, |c| c.count)
    }

    pub fn fraction(&self, label: &str) -> f64 {
        self.get(label).map_or(0.0, |c| c.fraction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryStat> {
        self.categories.iter()
    }

    /// Area of all valid cells in squared CRS units
    pub fn valid_area(&self) -> f64 {
        self.total_valid as f64 * self.cell_area
    }
}

/// Count the cells of each category.
///
/// Fractions are exact integer counts divided by the valid total; nothing is
/// rounded. Categories with no cells are still listed.
pub fn summarize(classified: &Classified) -> Result<LandCoverSummary> {
    let codes = classified.codes();
    let scheme = classified.scheme();
    let n = scheme.len();

    // Slot n holds nodata cells, slot n + 1 anything outside the scheme
    let row_counts: Vec<Vec<usize>> = (0..codes.rows())
        .into_par_iter()
        .map(|row| {
            let mut counts = vec![0usize; n + 2];
            for &code in codes.data().row(row) {
                counts[slot(code, n)] += 1;
            }
            counts
        })
        .collect();

    let counts = row_counts.into_iter().fold(vec![0usize; n + 2], merge);

    if counts[n + 1] > 0 {
        return Err(Error::Other(format!(
            "{} cells carry codes outside the classification scheme",
            counts[n + 1]
        )));
    }

    Ok(build_summary(scheme, &counts[..n], counts[n], codes.cell_area()))
}

#[inline]
fn slot(code: i32, n: usize) -> usize {
    if code == UNCLASSIFIED {
        return n;
    }
    match usize::try_from(code) {
        Ok(i) if i < n => i,
        _ => n + 1,
    }
}

fn merge(mut acc: Vec<usize>, part: Vec<usize>) -> Vec<usize> {
    for (a, p) in acc.iter_mut().zip(part) {
        *a += p;
    }
    acc
}

fn build_summary(
    scheme: &ClassificationScheme,
    counts: &[usize],
    unclassified: usize,
    cell_area: f64,
) -> LandCoverSummary {
    let total_valid: usize = counts.iter().sum();

    let categories = scheme
        .categories()
        .zip(counts)
        .map(|((code, label), &count)| CategoryStat {
            code,
            label: label.to_string(),
            count,
            fraction: if total_valid > 0 {
                count as f64 / total_valid as f64
            } else {
                0.0
            },
            area: count as f64 * cell_area,
        })
        .collect();

    LandCoverSummary {
        categories,
        total_valid,
        unclassified,
        cell_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagery::classify;
    use approx::assert_abs_diff_eq;
    use greencover_core::{GeoTransform, Raster};

    fn index_raster(values: Vec<f64>, rows: usize, cols: usize) -> Raster<f64> {
        Raster::from_vec(values, rows, cols)
            .unwrap()
            .with_transform(GeoTransform::new(0.0, 0.0, 10.0, -10.0))
    }

    #[test]
    fn test_counts_and_fractions() {
        let index = index_raster(
            vec![0.1, 0.3, 0.5, 0.8, 0.9, f64::NAN, 0.75, 0.2],
            2,
            4,
        );
        let classes = classify(&index, &ClassificationScheme::vegetation_density()).unwrap();
        let summary = summarize(&classes).unwrap();

        assert_eq!(summary.total_valid, 7);
        assert_eq!(summary.unclassified, 1);
        assert_eq!(summary.count("No vegetation"), 1);
        assert_eq!(summary.count("Sparse"), 2);
        assert_eq!(summary.count("Moderate"), 1);
        assert_eq!(summary.count("Dense"), 3);
        assert_abs_diff_eq!(summary.fraction("Dense"), 3.0 / 7.0, epsilon = 1e-15);
        assert_abs_diff_eq!(summary.get("Sparse").unwrap().area, 200.0);
        assert_abs_diff_eq!(summary.valid_area(), 700.0);
    }

    #[test]
    fn test_fractions_sum_to_one() {
        let values: Vec<f64> = (0..997).map(|i| ((i * 37) % 200) as f64 / 100.0 - 1.0).collect();
        let index = index_raster(values, 1, 997);
        let classes = classify(&index, &ClassificationScheme::vegetation_density()).unwrap();
        let summary = summarize(&classes).unwrap();

        let total: f64 = summary.iter().map(|c| c.fraction).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
        assert!(summary.iter().all(|c| c.fraction >= 0.0));
        assert_eq!(summary.iter().map(|c| c.count).sum::<usize>(), summary.total_valid);
    }

    #[test]
    fn test_empty_categories_listed() {
        let index = index_raster(vec![0.9, 0.95], 1, 2);
        let classes = classify(&index, &ClassificationScheme::vegetation_density()).unwrap();
        let summary = summarize(&classes).unwrap();

        assert_eq!(summary.categories.len(), 4);
        assert_eq!(summary.categories[0].label, "No vegetation");
        assert_eq!(summary.categories[0].count, 0);
        assert_eq!(summary.fraction("Dense"), 1.0);
    }

    #[test]
    fn test_all_nodata() {
        let index = index_raster(vec![f64::NAN; 4], 2, 2);
        let classes = classify(&index, &ClassificationScheme::vegetation_density()).unwrap();
        let summary = summarize(&classes).unwrap();

        assert_eq!(summary.total_valid, 0);
        assert_eq!(summary.unclassified, 4);
        assert!(summary.iter().all(|c| c.fraction == 0.0));
    }

    #[test]
    fn test_slot() {
        assert_eq!(slot(UNCLASSIFIED, 4), 4);
        assert_eq!(slot(0, 4), 0);
        assert_eq!(slot(3, 4), 3);
        assert_eq!(slot(4, 4), 5);
        assert_eq!(slot(-2, 4), 5);
    }

    #[test]
    fn test_merge_is_addition() {
        assert_eq!(merge(vec![1, 2, 3], vec![4, 5, 6]), vec![5, 7, 9]);
    }
}
