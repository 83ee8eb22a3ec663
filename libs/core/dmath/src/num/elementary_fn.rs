// -----------------------------------------------------------------------------
// Unary elementary functions
// -----------------------------------------------------------------------------
macro_rules! _define_elementary_unary {
    ($(#[$meta:meta])* $tr:ident, $fn:ident, $f32:path, $f64:path) => {
        $(#[$meta])*
        pub trait $tr: Sized {
            type Output;

            fn $fn(self) -> Self::Output;
        }

        impl $tr for f64 {
            type Output = Self;

            #[inline]
            fn $fn(self) -> Self::Output {
                $f64(self)
            }
        }

        impl $tr for f32 {
            type Output = Self;

            #[inline]
            fn $fn(self) -> Self::Output {
                $f32(self)
            }
        }
    };
}

_define_elementary_unary!(
    /// Trait to generalize square root interface.
    Sqrt, sqrt, f32::sqrt, f64::sqrt
);
_define_elementary_unary!(
    /// Trait to provide the exponential function interface.
    Exp, exp, f32::exp, f64::exp
);
_define_elementary_unary!(
    /// Trait to generalize logarithm (in natural base) function interface.
    Log, log, f32::ln, f64::ln
);
_define_elementary_unary!(
    /// Trait to generalize error function interface.
    Erf, erf, libm::erff, libm::erf
);
_define_elementary_unary!(Sin, sin, f32::sin, f64::sin);
_define_elementary_unary!(Cos, cos, f32::cos, f64::cos);
_define_elementary_unary!(Tan, tan, f32::tan, f64::tan);
_define_elementary_unary!(Asin, asin, f32::asin, f64::asin);
_define_elementary_unary!(Acos, acos, f32::acos, f64::acos);
_define_elementary_unary!(Atan, atan, f32::atan, f64::atan);
_define_elementary_unary!(Sinh, sinh, f32::sinh, f64::sinh);
_define_elementary_unary!(Cosh, cosh, f32::cosh, f64::cosh);
_define_elementary_unary!(Tanh, tanh, f32::tanh, f64::tanh);
_define_elementary_unary!(Asinh, asinh, f32::asinh, f64::asinh);
_define_elementary_unary!(Acosh, acosh, f32::acosh, f64::acosh);
_define_elementary_unary!(Atanh, atanh, f32::atanh, f64::atanh);

// -----------------------------------------------------------------------------
// Pow
// -----------------------------------------------------------------------------
/// Trait to generalize real power function interface.
///
/// Negative bases with non-integer exponents give `NaN` as [f64::powf] does.
pub trait Pow<Rhs = Self> {
    type Output;

    fn pow(self, exp: Rhs) -> Self::Output;
}

macro_rules! _impl_pow_for_float {
    ($t:ty) => {
        impl Pow<$t> for $t {
            type Output = Self;

            #[inline]
            fn pow(self, exp: $t) -> Self::Output {
                <$t>::powf(self, exp)
            }
        }

        impl<'a> Pow<&'a $t> for $t {
            type Output = Self;

            #[inline]
            fn pow(self, exp: &'a $t) -> Self::Output {
                <$t>::powf(self, *exp)
            }
        }
    };
}

_impl_pow_for_float!(f32);
_impl_pow_for_float!(f64);

// -----------------------------------------------------------------------------
// LogBase
// -----------------------------------------------------------------------------
/// Logarithm with an explicit base, `ln(self) / ln(base)`.
pub trait LogBase: Sized {
    type Base;
    type Output;

    fn log_base(self, base: Self::Base) -> Self::Output;
}

impl LogBase for f64 {
    type Base = f64;
    type Output = Self;

    #[inline]
    fn log_base(self, base: f64) -> Self::Output {
        self.ln() / base.ln()
    }
}

impl LogBase for f32 {
    type Base = f32;
    type Output = Self;

    #[inline]
    fn log_base(self, base: f32) -> Self::Output {
        self.ln() / base.ln()
    }
}
