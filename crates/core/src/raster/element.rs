//! Cell value types

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Types that can be stored in a raster cell.
pub trait RasterElement:
    Copy + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Sentinel used when a grid has no declared nodata value but one is needed
    fn default_nodata() -> Self;

    /// Whether this value is missing under the given sentinel.
    ///
    /// Floats treat NaN as missing regardless of the sentinel. The sentinel
    /// itself is compared exactly.
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    fn is_float() -> bool;

    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_raster_element_int {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata == Some(*self)
            }

            fn is_float() -> bool {
                false
            }
        }
    )*};
}

macro_rules! impl_raster_element_float {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                self.is_nan() || nodata == Some(*self)
            }

            fn is_float() -> bool {
                true
            }
        }
    )*};
}

impl_raster_element_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_raster_element_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f64::NAN.is_nodata(Some(-9999.0)));
        assert!((-9999.0f64).is_nodata(Some(-9999.0)));
        assert!(!(-9998.9f64).is_nodata(Some(-9999.0)));
        assert!(!0.0f64.is_nodata(None));
    }

    #[test]
    fn test_int_sentinel() {
        assert!((-1i32).is_nodata(Some(-1)));
        assert!(!0i32.is_nodata(Some(-1)));
        assert!(!0i32.is_nodata(None));
        assert_eq!(<u8 as RasterElement>::default_nodata(), 0);
    }
}
