//! Forward mode differentiation with sparse Jacobians.
//!
//! A [Dual] carries its value together with the partial derivatives
//! with respect to every variable it depends on.
//! A [DualVector] does the same element by element.
//! No graph is involved, so it serves as an independent check of the reverse mode engine.
//!
//! # Example
//! ```
//! use dautodiff::{forward::Dual, op};
//!
//! let x = Dual::var(3.0);
//! let y = Dual::var(2.0);
//!
//! let z = &x * &y + op::sin(&x);
//!
//! assert_eq!(z.value(), 6.0 + 3.0f64.sin());
//! assert_eq!(z.partial(&x).unwrap(), 2.0 + 3.0f64.cos());
//! assert_eq!(z.partial(&y).unwrap(), 3.0);
//! ```
mod dual_vector;

pub use dual_vector::DualVector;

use std::{
    collections::BTreeMap,
    ops::{Add, Div, Mul, Neg, Sub},
};

use dmath::num::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Erf, Exp, Log, LogBase, Pow, Sin, Sinh, Sqrt,
    Tan, Tanh,
};

use crate::Error;

// -----------------------------------------------------------------------------
// VarId
// -----------------------------------------------------------------------------
/// Identity of a variable created by [Dual::var] or [DualVector::var].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(uuid::Uuid);

impl VarId {
    #[inline]
    fn _new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for VarId {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Dual
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    value: f64,
    id: Option<VarId>,
    jacobian: BTreeMap<VarId, f64>,
}

//
// ctor
//
impl Dual {
    /// Create an independent variable.
    #[inline]
    pub fn var(value: f64) -> Self {
        let id = VarId::_new();
        Self {
            value,
            id: Some(id),
            jacobian: BTreeMap::from([(id, 1.0)]),
        }
    }

    /// Create a value which depends on no variable.
    #[inline]
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            id: None,
            jacobian: BTreeMap::new(),
        }
    }
}

impl From<f64> for Dual {
    #[inline]
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

// methods
impl Dual {
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Identity of this value if it was created by [Dual::var].
    #[inline]
    pub fn id(&self) -> Option<VarId> {
        self.id
    }

    #[inline]
    pub fn is_var(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub fn jacobian(&self) -> &BTreeMap<VarId, f64> {
        &self.jacobian
    }

    /// Partial derivative with respect to `var`.
    ///
    /// Zero if this value does not depend on `var`.
    ///
    /// # Errors
    /// [Error::NotAVariable] if `var` was not created by [Dual::var].
    pub fn partial(&self, var: &Dual) -> Result<f64, Error> {
        let id = var.id.ok_or(Error::NotAVariable)?;
        Ok(self.jacobian.get(&id).copied().unwrap_or_default())
    }
}

// impls
impl Dual {
    /// Result of a unary function with derivative `der` at `self`.
    fn _chain(&self, value: f64, der: f64) -> Self {
        Self {
            value,
            id: None,
            jacobian: self.jacobian.iter().map(|(k, v)| (*k, v * der)).collect(),
        }
    }

    /// Result of a binary function with derivatives `lder` and `rder` at `(self, rhs)`.
    fn _combine(&self, rhs: &Self, value: f64, lder: f64, rder: f64) -> Self {
        let mut jacobian: BTreeMap<_, _> =
            self.jacobian.iter().map(|(k, v)| (*k, v * lder)).collect();
        for (k, v) in &rhs.jacobian {
            *jacobian.entry(*k).or_default() += v * rder;
        }
        Self {
            value,
            id: None,
            jacobian,
        }
    }
}

//
// arithmetic operations
//
impl Neg for &Dual {
    type Output = Dual;

    #[inline]
    fn neg(self) -> Self::Output {
        self._chain(-self.value, -1.0)
    }
}

impl Neg for Dual {
    type Output = Dual;

    #[inline]
    fn neg(self) -> Self::Output {
        Neg::neg(&self)
    }
}

macro_rules! _define_dual_binary {
    (
        $tr:ident, $fn:ident,
        |$l:ident, $r:ident| $value:expr, $lder:expr, $rder:expr
    ) => {
        impl $tr<&Dual> for &Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: &Dual) -> Self::Output {
                let ($l, $r) = (self.value, rhs.value);
                self._combine(rhs, $value, $lder, $rder)
            }
        }

        impl $tr<f64> for &Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: f64) -> Self::Output {
                let ($l, $r) = (self.value, rhs);
                self._chain($value, $lder)
            }
        }

        impl $tr<&Dual> for f64 {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: &Dual) -> Self::Output {
                let ($l, $r) = (self, rhs.value);
                rhs._chain($value, $rder)
            }
        }

        impl $tr<Dual> for Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: Dual) -> Self::Output {
                $tr::$fn(&self, &rhs)
            }
        }

        impl $tr<&Dual> for Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: &Dual) -> Self::Output {
                $tr::$fn(&self, rhs)
            }
        }

        impl $tr<Dual> for &Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: Dual) -> Self::Output {
                $tr::$fn(self, &rhs)
            }
        }

        impl $tr<f64> for Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: f64) -> Self::Output {
                $tr::$fn(&self, rhs)
            }
        }

        impl $tr<Dual> for f64 {
            type Output = Dual;

            #[inline]
            fn $fn(self, rhs: Dual) -> Self::Output {
                $tr::$fn(self, &rhs)
            }
        }
    };
}

_define_dual_binary!(Add, add, |l, r| l + r, 1.0, 1.0);
_define_dual_binary!(Sub, sub, |l, r| l - r, 1.0, -1.0);
_define_dual_binary!(Mul, mul, |l, r| l * r, r, l);
_define_dual_binary!(Div, div, |l, r| l / r, 1.0 / r, -l / (r * r));
_define_dual_binary!(
    Pow,
    pow,
    |l, r| l.powf(r),
    r * l.powf(r - 1.0),
    l.powf(r) * l.ln()
);

//
// elementary functions
//
macro_rules! _define_dual_unary {
    ($tr:ident, $fn:ident, |$x:ident| $der:expr) => {
        impl $tr for &Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self) -> Self::Output {
                let $x = self.value;
                self._chain($tr::$fn($x), $der)
            }
        }

        impl $tr for Dual {
            type Output = Dual;

            #[inline]
            fn $fn(self) -> Self::Output {
                $tr::$fn(&self)
            }
        }
    };
}

_define_dual_unary!(Sqrt, sqrt, |x| 0.5 / x.sqrt());
_define_dual_unary!(Exp, exp, |x| x.exp());
_define_dual_unary!(Log, log, |x| 1.0 / x);
_define_dual_unary!(Erf, erf, |x| std::f64::consts::FRAC_2_SQRT_PI
    * (-x * x).exp());
_define_dual_unary!(Sin, sin, |x| x.cos());
_define_dual_unary!(Cos, cos, |x| -x.sin());
_define_dual_unary!(Tan, tan, |x| 1.0 / (x.cos() * x.cos()));
_define_dual_unary!(Asin, asin, |x| 1.0 / (1.0 - x * x).sqrt());
_define_dual_unary!(Acos, acos, |x| -1.0 / (1.0 - x * x).sqrt());
_define_dual_unary!(Atan, atan, |x| 1.0 / (1.0 + x * x));
_define_dual_unary!(Sinh, sinh, |x| x.cosh());
_define_dual_unary!(Cosh, cosh, |x| x.sinh());
_define_dual_unary!(Tanh, tanh, |x| 1.0 - x.tanh() * x.tanh());
_define_dual_unary!(Asinh, asinh, |x| 1.0 / (x * x + 1.0).sqrt());
_define_dual_unary!(Acosh, acosh, |x| 1.0 / (x * x - 1.0).sqrt());
_define_dual_unary!(Atanh, atanh, |x| 1.0 / (1.0 - x * x));

impl LogBase for &Dual {
    type Base = f64;
    type Output = Dual;

    #[inline]
    fn log_base(self, base: f64) -> Self::Output {
        let ln_base = base.ln();
        self._chain(self.value.ln() / ln_base, 1.0 / (self.value * ln_base))
    }
}

impl LogBase for Dual {
    type Base = f64;
    type Output = Dual;

    #[inline]
    fn log_base(self, base: f64) -> Self::Output {
        LogBase::log_base(&self, base)
    }
}
