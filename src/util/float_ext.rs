pub trait FloatExt: Sized {
    /// `self == other`
    fn eq(self, other: Self) -> bool;

    /// `self != other`
    fn not_eq(self, other: Self) -> bool;

    /// `self * other`, treating `0 * ∞` as `0`.
    fn mul_or_zero(self, other: Self) -> Self;
}

macro_rules! impl_float_ext {
    ( $ty:ty ) => {
        impl FloatExt for $ty {
            fn eq(self, other: Self) -> bool {
                (self - other).abs() < <$ty>::EPSILON
            }

            fn not_eq(self, other: Self) -> bool {
                (self - other).abs() >= <$ty>::EPSILON
            }

            fn mul_or_zero(self, other: Self) -> Self {
                if self == 0.0 || other == 0.0 {
                    0.0
                } else {
                    self * other
                }
            }
        }
    };
}

impl_float_ext!(f32);
impl_float_ext!(f64);
