//! End-to-end vegetation cover analysis for one scene
//!
//! boundary → mask → masked NIR/red → NDVI → classes → summary

use crate::imagery::{apply_mask, classify, ndvi, ClassificationScheme, Classified};
use crate::statistics::{summarize, LandCoverSummary};
use crate::vector::rasterize_boundary;
use greencover_core::raster::{check_alignment, Mask, Raster, RasterStatistics};
use greencover_core::vector::Boundary;
use greencover_core::Result;
use tracing::{debug, warn};

/// Every product of one pipeline run.
#[derive(Debug, Clone)]
pub struct VegetationReport {
    /// Area of interest rasterized onto the band grid
    pub mask: Mask,
    pub nir: Raster<f64>,
    pub red: Raster<f64>,
    /// NDVI of the masked bands
    pub index: Raster<f64>,
    pub index_stats: RasterStatistics<f64>,
    pub classes: Classified,
    pub summary: LandCoverSummary,
}

/// NDVI land cover analysis with a fixed classification scheme.
#[derive(Debug, Clone, Default)]
pub struct VegetationPipeline {
    scheme: ClassificationScheme,
}

impl VegetationPipeline {
    pub fn new(scheme: ClassificationScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &ClassificationScheme {
        &self.scheme
    }

    /// Run the analysis on a NIR/red band pair restricted to `boundary`.
    ///
    /// The bands must be aligned with each other, and every boundary part
    /// that declares a CRS must use the bands' CRS.
    pub fn run(
        &self,
        nir: &Raster<f64>,
        red: &Raster<f64>,
        boundary: &Boundary,
    ) -> Result<VegetationReport> {
        check_alignment(nir, red)?;
        let (rows, cols) = nir.shape();

        debug!(rows, cols, parts = boundary.parts().len(), "rasterizing boundary");
        let mask = rasterize_boundary(boundary, nir)?;
        let inside = mask.count_inside();
        if inside == 0 {
            warn!("boundary does not cover any pixel center of the bands");
        }
        debug!(inside, outside = rows * cols - inside, "mask ready");

        let nir = apply_mask(nir, &mask)?;
        let red = apply_mask(red, &mask)?;

        let index = ndvi(&nir, &red)?;
        let index_stats = index.statistics();
        debug!(
            valid = index_stats.valid_count,
            min = ?index_stats.min,
            max = ?index_stats.max,
            mean = ?index_stats.mean,
            "vegetation index computed"
        );

        let classes = classify(&index, &self.scheme)?;
        let summary = summarize(&classes)?;
        debug!(
            total_valid = summary.total_valid,
            unclassified = summary.unclassified,
            "land cover summarized"
        );

        Ok(VegetationReport {
            mask,
            nir,
            red,
            index,
            index_stats,
            classes,
            summary,
        })
    }
}
