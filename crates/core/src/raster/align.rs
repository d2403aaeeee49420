//! Georeference comparison between grids

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::GeoTransform;

/// Anything laid out on a georeferenced pixel grid.
pub trait Georeferenced {
    /// Dimensions as (rows, cols)
    fn shape(&self) -> (usize, usize);

    fn transform(&self) -> &GeoTransform;

    fn crs(&self) -> Option<&Crs>;
}

/// Require two grids to share shape, transform and CRS exactly.
///
/// The first differing property is reported with both values.
pub fn check_alignment<A, B>(a: &A, b: &B) -> Result<()>
where
    A: Georeferenced + ?Sized,
    B: Georeferenced + ?Sized,
{
    let (ar, ac) = a.shape();
    let (br, bc) = b.shape();
    if (ar, ac) != (br, bc) {
        return Err(Error::mismatch(
            "dimensions",
            format!("{}x{}", ac, ar),
            format!("{}x{}", bc, br),
        ));
    }

    let (ta, tb) = (a.transform(), b.transform());
    if ta.pixel_width != tb.pixel_width || ta.pixel_height != tb.pixel_height {
        return Err(Error::mismatch("pixel size", ta, tb));
    }
    if ta.origin_x != tb.origin_x || ta.origin_y != tb.origin_y {
        return Err(Error::mismatch("origin", ta, tb));
    }

    check_crs(a.crs(), b.crs())
}

/// Require two optional CRS identifiers to be equal
pub fn check_crs(a: Option<&Crs>, b: Option<&Crs>) -> Result<()> {
    if a != b {
        return Err(Error::mismatch("crs", display_crs(a), display_crs(b)));
    }
    Ok(())
}

fn display_crs(crs: Option<&Crs>) -> String {
    crs.map_or_else(|| "<none>".to_string(), Crs::identifier)
}
