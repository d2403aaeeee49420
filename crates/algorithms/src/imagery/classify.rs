//! Threshold classification
//!
//! Maps continuous values onto ordered, labeled categories. Intervals are
//! closed below and open above: with thresholds `t1 < t2 < ... < tn`,
//!
//! ```text
//! code 0      (-inf, t1)     below label
//! code i      [ti, ti+1)     label of threshold i
//! code n      [tn, +inf)     label of threshold n
//! ```
//!
//! Nodata cells get [`UNCLASSIFIED`].

use crate::maybe_rayon::*;
use greencover_core::raster::Raster;
use greencover_core::{Error, Result};
use serde::Serialize;

/// Code of cells that had no valid value; also the classified raster's nodata
pub const UNCLASSIFIED: i32 = -1;

/// Label reported for [`UNCLASSIFIED`] cells
pub const UNCLASSIFIED_LABEL: &str = "No data";

/// Ordered cut points with one label per interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationScheme {
    thresholds: Vec<f64>,
    /// `labels[0]` is the below-all label, `labels[i]` belongs to threshold `i`
    labels: Vec<String>,
}

impl ClassificationScheme {
    /// Build a scheme from `(threshold, label)` pairs and the label for values
    /// below the first threshold.
    ///
    /// Thresholds must be finite, non-empty and strictly increasing in the
    /// order given; labels must be unique. Anything else is a
    /// `Configuration` error.
    pub fn new<S: Into<String>>(breaks: Vec<(f64, S)>, below_label: impl Into<String>) -> Result<Self> {
        if breaks.is_empty() {
            return Err(Error::Configuration("threshold list is empty".into()));
        }

        let mut thresholds = Vec::with_capacity(breaks.len());
        let mut labels = vec![below_label.into()];
        for (t, label) in breaks {
            if !t.is_finite() {
                return Err(Error::Configuration(format!("threshold {} is not finite", t)));
            }
            if let Some(&prev) = thresholds.last() {
                if t <= prev {
                    return Err(Error::Configuration(format!(
                        "thresholds must be strictly increasing: {} follows {}",
                        t, prev
                    )));
                }
            }
            thresholds.push(t);
            labels.push(label.into());
        }

        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(Error::Configuration(format!("category {} has an empty label", i)));
            }
            if label == UNCLASSIFIED_LABEL {
                return Err(Error::Configuration(format!(
                    "label '{}' is reserved",
                    UNCLASSIFIED_LABEL
                )));
            }
            if labels[..i].contains(label) {
                return Err(Error::Configuration(format!("duplicate label '{}'", label)));
            }
        }

        Ok(Self { thresholds, labels })
    }

    /// Vegetation density classes used for NDVI land cover summaries
    pub fn vegetation_density() -> Self {
        Self {
            thresholds: vec![0.2, 0.45, 0.7],
            labels: ["No vegetation", "Sparse", "Moderate", "Dense"]
                .map(String::from)
                .to_vec(),
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of categories, including the below-all one
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Category code for a present value
    #[inline]
    pub fn code_for(&self, value: f64) -> i32 {
        self.thresholds.partition_point(|&t| t <= value) as i32
    }

    /// Label for a code, including [`UNCLASSIFIED`]
    pub fn label(&self, code: i32) -> Option<&str> {
        if code == UNCLASSIFIED {
            return Some(UNCLASSIFIED_LABEL);
        }
        usize::try_from(code)
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    /// `(code, label)` of every category in code order
    pub fn categories(&self) -> impl Iterator<Item = (i32, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (i as i32, l.as_str()))
    }
}

impl Default for ClassificationScheme {
    fn default() -> Self {
        Self::vegetation_density()
    }
}

/// A raster of category codes together with the scheme that produced it.
#[derive(Debug, Clone)]
pub struct Classified {
    codes: Raster<i32>,
    scheme: ClassificationScheme,
}

impl Classified {
    /// Code raster; nodata is [`UNCLASSIFIED`]
    pub fn codes(&self) -> &Raster<i32> {
        &self.codes
    }

    pub fn scheme(&self) -> &ClassificationScheme {
        &self.scheme
    }

    pub fn code_at(&self, row: usize, col: usize) -> Result<i32> {
        self.codes.get(row, col)
    }

    pub fn label_at(&self, row: usize, col: usize) -> Result<&str> {
        let code = self.codes.get(row, col)?;
        self.scheme
            .label(code)
            .ok_or_else(|| Error::Other(format!("unknown category code {}", code)))
    }

}

/// Classify every present cell of `raster` with `scheme`.
///
/// # Example
/// ```
/// use greencover_algorithms::imagery::{classify, ClassificationScheme};
/// use greencover_core::Raster;
///
/// let index = Raster::from_vec(vec![0.1, 0.2, 0.5, 0.9], 2, 2).unwrap();
/// let classes = classify(&index, &ClassificationScheme::vegetation_density()).unwrap();
/// assert_eq!(classes.label_at(0, 0).unwrap(), "No vegetation");
/// assert_eq!(classes.label_at(0, 1).unwrap(), "Sparse");
/// assert_eq!(classes.label_at(1, 1).unwrap(), "Dense");
/// ```
pub fn classify(raster: &Raster<f64>, scheme: &ClassificationScheme) -> Result<Classified> {
    let rows = raster.rows();

    let data: Vec<i32> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            raster
                .data()
                .row(row)
                .iter()
                .map(|&v| {
                    if raster.is_nodata(v) {
                        UNCLASSIFIED
                    } else {
                        scheme.code_for(v)
                    }
                })
                .collect::<Vec<i32>>()
        })
        .collect();

    Ok(Classified {
        codes: raster.derive(data, Some(UNCLASSIFIED))?,
        scheme: scheme.clone(),
    })
}
