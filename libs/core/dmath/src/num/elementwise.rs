use std::{
    fmt::Display,
    ops::{Add, AddAssign, Deref, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use itertools::Itertools;

use super::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Erf, Exp, FloatBased, Log, LogBase, Numeric,
    Pow, Sin, Sinh, Sqrt, Tan, Tanh,
};

// -----------------------------------------------------------------------------
// Elementwise
// -----------------------------------------------------------------------------
/// One dimensional array whose arithmetic and elementary functions act element by element.
///
/// Binary operations require both operands to have the same length and panic otherwise.
/// Scalars are broadcast explicitly with [Numeric::full_like].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Elementwise<T>(Vec<T>);

//
// ctor
//
impl<T> From<Vec<T>> for Elementwise<T> {
    #[inline]
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T: Clone> From<&[T]> for Elementwise<T> {
    #[inline]
    fn from(values: &[T]) -> Self {
        Self(values.to_vec())
    }
}

impl<T, const N: usize> From<[T; N]> for Elementwise<T> {
    #[inline]
    fn from(values: [T; N]) -> Self {
        Self(values.into())
    }
}

impl<T> FromIterator<T> for Elementwise<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Elementwise<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> Deref for Elementwise<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<[T]> for Elementwise<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T: Display> Display for Elementwise<T> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

//
// methods
//
impl<T> Elementwise<T> {
    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    /// Apply `f` to each element.
    #[inline]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Elementwise<U> {
        Elementwise(self.0.into_iter().map(f).collect())
    }

    /// Combine with `rhs` element by element.
    ///
    /// # Panics
    /// Panics if the lengths differ. `op` names the operation in the message.
    #[inline]
    pub fn zip_map(self, rhs: &Self, op: &str, mut f: impl FnMut(T, &T) -> T) -> Self {
        _assert_same_len(op, self.len(), rhs.len());
        Self(
            self.0
                .into_iter()
                .zip(rhs.0.iter())
                .map(|(l, r)| f(l, r))
                .collect(),
        )
    }

    #[inline]
    fn _zip_apply(&mut self, rhs: &Self, op: &str, mut f: impl FnMut(&mut T, &T)) {
        _assert_same_len(op, self.len(), rhs.len());
        self.0.iter_mut().zip(rhs.0.iter()).for_each(|(l, r)| f(l, r));
    }
}

#[inline]
fn _assert_same_len(op: &str, lhs: usize, rhs: usize) {
    assert_eq!(
        lhs, rhs,
        "elementwise {op}: length mismatch (lhs={lhs}, rhs={rhs})"
    );
}

//
// arithmetic operations
//
impl<T: Neg<Output = T>> Neg for Elementwise<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map(Neg::neg)
    }
}

macro_rules! _define_arithmetic_binary {
    ($tr:ident, $fn:ident, $tr_assign:ident, $fn_assign:ident) => {
        impl<'a, T> $tr<&'a Elementwise<T>> for Elementwise<T>
        where
            T: for<'b> $tr<&'b T, Output = T>,
        {
            type Output = Self;

            #[inline]
            fn $fn(self, rhs: &'a Elementwise<T>) -> Self::Output {
                self.zip_map(rhs, stringify!($fn), |l, r| $tr::$fn(l, r))
            }
        }

        impl<'a, T> $tr_assign<&'a Elementwise<T>> for Elementwise<T>
        where
            T: for<'b> $tr_assign<&'b T>,
        {
            #[inline]
            fn $fn_assign(&mut self, rhs: &'a Elementwise<T>) {
                self._zip_apply(rhs, stringify!($fn_assign), |l, r| {
                    $tr_assign::$fn_assign(l, r)
                });
            }
        }
    };
}

_define_arithmetic_binary!(Add, add, AddAssign, add_assign);
_define_arithmetic_binary!(Sub, sub, SubAssign, sub_assign);
_define_arithmetic_binary!(Mul, mul, MulAssign, mul_assign);
_define_arithmetic_binary!(Div, div, DivAssign, div_assign);

//
// elementary functions
//
macro_rules! _define_elementary_unary {
    ($tr:ident, $fn:ident) => {
        impl<T: $tr<Output = T>> $tr for Elementwise<T> {
            type Output = Self;

            #[inline]
            fn $fn(self) -> Self::Output {
                self.map($tr::$fn)
            }
        }
    };
}

_define_elementary_unary!(Sqrt, sqrt);
_define_elementary_unary!(Exp, exp);
_define_elementary_unary!(Log, log);
_define_elementary_unary!(Erf, erf);
_define_elementary_unary!(Sin, sin);
_define_elementary_unary!(Cos, cos);
_define_elementary_unary!(Tan, tan);
_define_elementary_unary!(Asin, asin);
_define_elementary_unary!(Acos, acos);
_define_elementary_unary!(Atan, atan);
_define_elementary_unary!(Sinh, sinh);
_define_elementary_unary!(Cosh, cosh);
_define_elementary_unary!(Tanh, tanh);
_define_elementary_unary!(Asinh, asinh);
_define_elementary_unary!(Acosh, acosh);
_define_elementary_unary!(Atanh, atanh);

impl<'a, T> Pow<&'a Elementwise<T>> for Elementwise<T>
where
    T: for<'b> Pow<&'b T, Output = T>,
{
    type Output = Self;

    #[inline]
    fn pow(self, exp: &'a Elementwise<T>) -> Self::Output {
        self.zip_map(exp, "pow", |l, r| Pow::pow(l, r))
    }
}

impl<T> LogBase for Elementwise<T>
where
    T: LogBase<Output = T>,
    T::Base: Clone,
{
    type Base = T::Base;
    type Output = Self;

    #[inline]
    fn log_base(self, base: Self::Base) -> Self::Output {
        self.map(|v| v.log_base(base.clone()))
    }
}

//
// numeric
//
impl<T: FloatBased> FloatBased for Elementwise<T> {
    type BaseFloat = T::BaseFloat;

    #[inline]
    fn nearest_base_float_of_f64(v: f64) -> Self::BaseFloat {
        T::nearest_base_float_of_f64(v)
    }
}

impl<T> Numeric for Elementwise<T>
where
    T: Numeric<BaseFloat = T>,
{
    #[inline]
    fn full_like(&self, v: Self::BaseFloat) -> Self {
        Self(vec![v; self.len()])
    }

    #[inline]
    fn num_elems(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(vec![1.0, 2.0], vec![3.0, -4.0])]
    #[case(vec![0.5], vec![0.25])]
    #[case(vec![-3.5, 4.0, 1.0], vec![2.0, 2.0, -1.0])]
    fn test_arithmetic(#[case] lhs: Vec<f64>, #[case] rhs: Vec<f64>) {
        let x = Elementwise::from(lhs.clone());
        let y = Elementwise::from(rhs.clone());

        let expected = |f: fn(f64, f64) -> f64| -> Vec<f64> {
            lhs.iter().zip(&rhs).map(|(l, r)| f(*l, *r)).collect()
        };

        assert_eq!((x.clone() + &y).into_inner(), expected(|l, r| l + r));
        assert_eq!((x.clone() - &y).into_inner(), expected(|l, r| l - r));
        assert_eq!((x.clone() * &y).into_inner(), expected(|l, r| l * r));
        assert_eq!((x.clone() / &y).into_inner(), expected(|l, r| l / r));
        assert_eq!(
            (-x).into_inner(),
            lhs.iter().map(|l| -l).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_assign_ops() {
        let mut x = Elementwise::from([1.0, 2.0]);
        let y = Elementwise::from([3.0, 4.0]);

        x += &y;
        assert_eq!(x, Elementwise::from([4.0, 6.0]));
        x -= &y;
        assert_eq!(x, Elementwise::from([1.0, 2.0]));
        x *= &y;
        assert_eq!(x, Elementwise::from([3.0, 8.0]));
        x /= &y;
        assert_eq!(x, Elementwise::from([1.0, 2.0]));
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_add_length_mismatch() {
        let _ = Elementwise::from([1.0, 2.0]) + &Elementwise::from([1.0]);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_add_assign_length_mismatch() {
        let mut x = Elementwise::from([1.0, 2.0]);
        x += &Elementwise::from([1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_elementary() {
        let x = Elementwise::from([0.6, 0.25]);

        let y = x.clone().sin();
        let z = x.clone().log_base(10.0);
        let w = x.clone().pow(&Elementwise::from([2.0, 0.5]));

        assert_eq!(y[0], 0.6f64.sin());
        assert_eq!(y[1], 0.25f64.sin());
        assert_abs_diff_eq!(z[0], 0.6f64.log10(), epsilon = 1e-15);
        assert_abs_diff_eq!(z[1], 0.25f64.log10(), epsilon = 1e-15);
        assert_abs_diff_eq!(w[0], 0.36, epsilon = 1e-15);
        assert_abs_diff_eq!(w[1], 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_numeric() {
        let x = Elementwise::from([0.6, 0.25, 3.0]);

        assert_eq!(x.num_elems(), 3);
        assert_eq!(x.zeros_like(), Elementwise::from([0.0; 3]));
        assert_eq!(x.ones_like(), Elementwise::from([1.0; 3]));
        assert_eq!(x.full_like(2.5), Elementwise::from([2.5; 3]));
    }

    #[test]
    fn test_display() {
        let x = Elementwise::from([0.5, -1.0, 2.0]);

        assert_eq!(x.to_string(), "[0.5, -1, 2]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let x = Elementwise::from([0.5, -1.0]);

        let json = serde_json::to_string(&x).unwrap();
        let de: Elementwise<f64> = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "[0.5,-1.0]");
        assert_eq!(de, x);
    }
}
