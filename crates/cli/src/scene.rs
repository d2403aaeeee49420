//! JSON scene documents
//!
//! A scene bundles a NIR/red band pair on one grid with the area of interest:
//!
//! ```json
//! {
//!   "crs": "EPSG:32633",
//!   "transform": { "origin_x": 500000.0, "origin_y": 4100000.0,
//!                  "pixel_width": 10.0, "pixel_height": -10.0 },
//!   "rows": 2, "cols": 2,
//!   "nodata": -9999.0,
//!   "nir": [0.8, 0.6, 0.5, null],
//!   "red": [0.1, 0.2, 0.1, 0.1],
//!   "boundary": [ { "exterior": [[500000, 4100000], [500020, 4100000], [500020, 4099980]],
//!                   "holes": [] } ]
//! }
//! ```
//!
//! Samples are row-major; `null` marks a missing sample.

use anyhow::{bail, Context, Result};
use greencover_core::{Boundary, Crs, GeoTransform, Polygon, Raster};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDoc {
    #[serde(default)]
    crs: Option<Crs>,
    transform: GeoTransform,
    rows: usize,
    cols: usize,
    #[serde(default)]
    nodata: Option<f64>,
    nir: Vec<Option<f64>>,
    red: Vec<Option<f64>>,
    boundary: Vec<PolygonDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolygonDoc {
    exterior: Vec<[f64; 2]>,
    #[serde(default)]
    holes: Vec<Vec<[f64; 2]>>,
}

/// Bands and boundary ready for the pipeline
#[derive(Debug)]
pub struct Scene {
    pub nir: Raster<f64>,
    pub red: Raster<f64>,
    pub boundary: Boundary,
}

impl SceneDoc {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid scene document")
    }

    pub fn into_scene(self) -> Result<Scene> {
        let nir = self.band("nir", self.nir.clone())?;
        let red = self.band("red", self.red.clone())?;

        if self.boundary.is_empty() {
            bail!("Scene has no boundary polygons");
        }
        let parts = self
            .boundary
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                Polygon::new(p.exterior, p.holes)
                    .with_context(|| format!("Boundary polygon {} is invalid", i))
            })
            .collect::<Result<Vec<_>>>()?;
        let boundary = Boundary::new(parts)?.with_crs(self.crs);

        Ok(Scene {
            nir,
            red,
            boundary,
        })
    }

    fn band(&self, name: &str, samples: Vec<Option<f64>>) -> Result<Raster<f64>> {
        let fill = self.nodata.unwrap_or(f64::NAN);
        let values: Vec<f64> = samples.into_iter().map(|v| v.unwrap_or(fill)).collect();
        let raster = Raster::from_vec(values, self.rows, self.cols)
            .with_context(|| format!("Band '{}' does not match {}x{}", name, self.cols, self.rows))?;
        Ok(raster
            .with_transform(self.transform)
            .with_crs(self.crs.clone())
            .with_nodata(self.nodata))
    }
}

pub fn read_scene(path: &Path) -> Result<Scene> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SceneDoc::from_json(&text)?.into_scene()
}
