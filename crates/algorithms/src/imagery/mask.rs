//! Area-of-interest masking

use crate::maybe_rayon::*;
use greencover_core::raster::{check_alignment, Mask, Raster, RasterElement};
use greencover_core::{Error, Result};

/// Set every cell outside `mask` to nodata.
///
/// Cells inside the mask keep their value, including existing nodata. The
/// output keeps the input's nodata sentinel. Float rasters without one are
/// filled with NaN.
///
/// Fails with `MismatchedGeoreference` when the mask is not aligned with the
/// raster, and with `Configuration` for an integer raster that declares no
/// nodata value, since any fill value could collide with real data.
pub fn apply_mask<T: RasterElement>(raster: &Raster<T>, mask: &Mask) -> Result<Raster<T>> {
    check_alignment(raster, mask)?;

    if !T::is_float() && raster.nodata().is_none() {
        return Err(Error::Configuration(
            "integer raster has no nodata value; declare one before masking".into(),
        ));
    }
    let fill = raster.nodata_or_default();
    let flags = mask.view();
    let rows = raster.rows();

    let data: Vec<T> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            raster
                .data()
                .row(row)
                .iter()
                .zip(flags.row(row).iter())
                .map(|(&v, &inside)| if inside { v } else { fill })
                .collect::<Vec<T>>()
        })
        .collect();

    raster.derive(data, raster.nodata())
}

#[cfg(test)]
mod tests {
    use super::*;
    use greencover_core::GeoTransform;

    fn band() -> Raster<f64> {
        Raster::from_vec((1..=9).map(f64::from).collect(), 3, 3)
            .unwrap()
            .with_transform(GeoTransform::new(0.0, 3.0, 1.0, -1.0))
    }

    fn checker(template: &Raster<f64>) -> Mask {
        Mask::from_vec(template, (0..9).map(|i| i % 2 == 0).collect()).unwrap()
    }

    #[test]
    fn test_outside_becomes_nodata() {
        let input = band();
        let masked = apply_mask(&input, &checker(&input)).unwrap();

        assert_eq!(masked.value(0, 0).unwrap(), Some(1.0));
        assert_eq!(masked.value(0, 1).unwrap(), None);
        assert_eq!(masked.valid_count(), 5);
        // Input untouched
        assert_eq!(input.valid_count(), 9);
    }

    #[test]
    fn test_keeps_declared_sentinel() {
        let input = band().with_nodata(Some(-9999.0));
        let masked = apply_mask(&input, &checker(&input)).unwrap();
        assert_eq!(masked.get(0, 1).unwrap(), -9999.0);
        assert_eq!(masked.nodata(), Some(-9999.0));
    }

    #[test]
    fn test_integer_raster_with_sentinel() {
        let template = band();
        let classes = template.derive(vec![3i32; 9], Some(-1)).unwrap();
        let masked = apply_mask(&classes, &checker(&template)).unwrap();
        assert_eq!(masked.nodata(), Some(-1));
        assert_eq!(masked.get(0, 1).unwrap(), -1);
        assert_eq!(masked.value(0, 1).unwrap(), None);
        assert_eq!(masked.value(1, 1).unwrap(), Some(3));
    }

    #[test]
    fn test_integer_raster_without_sentinel_rejected() {
        let template = Raster::<f64>::new(2, 2);
        let counts = template.derive(vec![0u16, 120, 0, 455], None).unwrap();
        assert!(matches!(
            apply_mask(&counts, &Mask::like(&counts, true)),
            Err(Error::Configuration(_))
        ));

        // With a sentinel outside the data, zeros survive an all-inside mask
        let counts = template.derive(vec![0u16, 120, 0, 455], Some(u16::MAX)).unwrap();
        let masked = apply_mask(&counts, &Mask::like(&counts, true)).unwrap();
        assert_eq!(masked.valid_count(), 4);
        assert_eq!(masked.value(0, 0).unwrap(), Some(0));
        assert!(masked.equivalent(&counts));
    }

    #[test]
    fn test_idempotent() {
        let input = band();
        let mask = checker(&input);
        let once = apply_mask(&input, &mask).unwrap();
        let twice = apply_mask(&once, &mask).unwrap();
        assert!(once.equivalent(&twice));
    }

    #[test]
    fn test_all_inside_is_noop() {
        let mut input = band();
        input.set(1, 1, f64::NAN).unwrap();
        let masked = apply_mask(&input, &Mask::like(&input, true)).unwrap();
        assert!(masked.equivalent(&input));
    }

    #[test]
    fn test_rejects_misaligned_mask() {
        let input = band();
        let other = Raster::<f64>::new(3, 3).with_transform(GeoTransform::new(0.0, 3.0, 2.0, -2.0));
        assert!(matches!(
            apply_mask(&input, &Mask::like(&other, true)),
            Err(Error::MismatchedGeoreference { property: "pixel size", .. })
        ));
    }
}
