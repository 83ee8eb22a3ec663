use std::{
    fmt::Debug,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num::{One, Zero};

use super::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Erf, Exp, Log, Pow, Sin, Sinh, Sqrt, Tan,
    Tanh,
};

// -----------------------------------------------------------------------------
// FloatBased
//
/// Some numeric types are based on some floating points.
/// This trait provides a way to access the base floating point type.
pub trait FloatBased {
    type BaseFloat: num::Float + Arithmetic + Debug;

    #[inline]
    fn nearest_base_float_of_f64(v: f64) -> Self::BaseFloat {
        <Self::BaseFloat as num::NumCast>::from(v)
            .or_else(|| <Self::BaseFloat as num::NumCast>::from(v as f32))
            .unwrap_or_else(<Self::BaseFloat as num::Float>::nan)
    }
}

impl FloatBased for f32 {
    type BaseFloat = f32;

    #[inline]
    fn nearest_base_float_of_f64(v: f64) -> f32 {
        v as f32
    }
}

impl FloatBased for f64 {
    type BaseFloat = f64;

    #[inline]
    fn nearest_base_float_of_f64(v: f64) -> Self::BaseFloat {
        v
    }
}

// -----------------------------------------------------------------------------
// Arithmetic
// -----------------------------------------------------------------------------
/// Trait for arithmetic operations.
/// Intentionally declared loosely, such as no `Copy` requirement,
/// so that heap-allocated element-wise arrays satisfy it as well.
///
/// # Example
/// ```
/// use dmath::num::{Arithmetic, Elementwise};
/// use static_assertions::assert_impl_all;
///
/// // integer types
/// assert_impl_all!(i32: Arithmetic);
/// assert_impl_all!(i64: Arithmetic);
///
/// // floating-point types
/// assert_impl_all!(f32: Arithmetic);
/// assert_impl_all!(f64: Arithmetic);
///
/// // element-wise arrays
/// assert_impl_all!(Elementwise<f64>: Arithmetic);
/// ```
pub trait Arithmetic:
    Clone
    + Neg<Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> Div<&'a Self, Output = Self>
    + for<'a> DivAssign<&'a Self>
{
}

impl<T> Arithmetic for T where
    T: Clone
        + Neg<Output = Self>
        + for<'a> Add<&'a Self, Output = Self>
        + for<'a> AddAssign<&'a Self>
        + for<'a> Sub<&'a Self, Output = Self>
        + for<'a> SubAssign<&'a Self>
        + for<'a> Mul<&'a Self, Output = Self>
        + for<'a> MulAssign<&'a Self>
        + for<'a> Div<&'a Self, Output = Self>
        + for<'a> DivAssign<&'a Self>
{
}

// -----------------------------------------------------------------------------
// Numeric
// -----------------------------------------------------------------------------
/// Values carried by differentiable nodes.
///
/// A [Numeric] is either a single float or an element-wise array of floats.
/// Every operation, including the elementary functions, acts element by element,
/// so derivative formulas written against this trait serve both ranks.
///
/// Constants of the base float are broadcast with [Numeric::full_like].
///
/// # Example
/// ```
/// use dmath::num::{Elementwise, Numeric};
/// use static_assertions::assert_impl_all;
///
/// assert_impl_all!(f32: Numeric);
/// assert_impl_all!(f64: Numeric);
/// assert_impl_all!(Elementwise<f64>: Numeric);
/// ```
pub trait Numeric:
    Arithmetic
    + FloatBased
    + PartialEq
    + Debug
    + for<'a> Pow<&'a Self, Output = Self>
    + Sqrt<Output = Self>
    + Exp<Output = Self>
    + Log<Output = Self>
    + Erf<Output = Self>
    + Sin<Output = Self>
    + Cos<Output = Self>
    + Tan<Output = Self>
    + Asin<Output = Self>
    + Acos<Output = Self>
    + Atan<Output = Self>
    + Sinh<Output = Self>
    + Cosh<Output = Self>
    + Tanh<Output = Self>
    + Asinh<Output = Self>
    + Acosh<Output = Self>
    + Atanh<Output = Self>
{
    /// Value of the same shape as `self` whose elements are all `v`.
    fn full_like(&self, v: Self::BaseFloat) -> Self;

    /// Number of elements. Scalars have exactly one.
    fn num_elems(&self) -> usize;

    #[inline]
    fn zeros_like(&self) -> Self {
        self.full_like(<Self::BaseFloat as Zero>::zero())
    }

    #[inline]
    fn ones_like(&self) -> Self {
        self.full_like(<Self::BaseFloat as One>::one())
    }

    #[inline]
    fn nearest_like(&self, v: f64) -> Self {
        self.full_like(Self::nearest_base_float_of_f64(v))
    }
}

macro_rules! _impl_numeric_for_float {
    ($t:ty) => {
        impl Numeric for $t {
            #[inline]
            fn full_like(&self, v: Self::BaseFloat) -> Self {
                v
            }

            #[inline]
            fn num_elems(&self) -> usize {
                1
            }
        }
    };
}

_impl_numeric_for_float!(f32);
_impl_numeric_for_float!(f64);
