use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::{Add, Div, Index, Mul, Neg, Sub},
};

use dmath::num::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Elementwise, Erf, Exp, Log, LogBase, Pow,
    Sin, Sinh, Sqrt, Tan, Tanh,
};

use super::{Dual, VarId};
use crate::Error;

// -----------------------------------------------------------------------------
// DualVector
// -----------------------------------------------------------------------------
/// Forward mode counterpart of [VectorNode](crate::VectorNode).
///
/// Every operation acts element by element, so the Jacobian with respect to
/// a vector variable is diagonal and stored as an [Elementwise] per variable.
///
/// Like the reverse mode engine, each vector owns one independent scalar
/// variable per element, see [DualVector::component].
///
/// # Example
/// ```
/// use dautodiff::{forward::DualVector, op, Elementwise};
///
/// let v = DualVector::var([0.5, 2.0]).unwrap();
///
/// let y = op::sin(&v) * &v;
///
/// let expected: Elementwise<f64> = [0.5f64, 2.0]
///     .into_iter()
///     .map(|x| x.sin() + x * x.cos())
///     .collect();
/// assert_eq!(y.partial(&v).unwrap(), expected);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DualVector {
    value: Elementwise<f64>,
    id: Option<VarId>,
    jacobian: BTreeMap<VarId, Elementwise<f64>>,
    components: Vec<Dual>,
}

//
// ctor
//
impl DualVector {
    fn _new(
        value: Elementwise<f64>,
        id: Option<VarId>,
        jacobian: BTreeMap<VarId, Elementwise<f64>>,
    ) -> Self {
        let components = value.iter().copied().map(Dual::var).collect();
        Self {
            value,
            id,
            jacobian,
            components,
        }
    }

    /// Create an independent vector variable.
    ///
    /// # Errors
    /// [Error::EmptyVector] if `values` is empty.
    pub fn var(values: impl Into<Elementwise<f64>>) -> Result<Self, Error> {
        let value = values.into();
        if value.is_empty() {
            return Err(Error::EmptyVector);
        }
        let id = VarId::_new();
        let ones = value.iter().map(|_| 1.0).collect();
        Ok(Self::_new(value, Some(id), BTreeMap::from([(id, ones)])))
    }

    /// Create a vector which depends on no variable.
    ///
    /// # Errors
    /// [Error::EmptyVector] if `values` is empty.
    pub fn constant(values: impl Into<Elementwise<f64>>) -> Result<Self, Error> {
        let value = values.into();
        if value.is_empty() {
            return Err(Error::EmptyVector);
        }
        Ok(Self::_new(value, None, BTreeMap::new()))
    }
}

// methods
impl DualVector {
    #[inline]
    pub fn value(&self) -> &Elementwise<f64> {
        &self.value
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Always `false`, empty vectors cannot be created.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    #[inline]
    pub fn id(&self) -> Option<VarId> {
        self.id
    }

    #[inline]
    pub fn is_var(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub fn jacobian(&self) -> &BTreeMap<VarId, Elementwise<f64>> {
        &self.jacobian
    }

    /// Scalar variable standing for the `index`-th element.
    ///
    /// It is independent of this vector: functions of it have no derivative
    /// with respect to the vector, and vice versa.
    ///
    /// # Errors
    /// [Error::ComponentOutOfRange] if `index >= self.len()`.
    pub fn component(&self, index: usize) -> Result<&Dual, Error> {
        self.components
            .get(index)
            .ok_or(Error::ComponentOutOfRange {
                index,
                len: self.len(),
            })
    }

    #[inline]
    pub fn components(&self) -> &[Dual] {
        &self.components
    }

    /// Element-wise derivative with respect to `var`.
    ///
    /// Zeros if this vector does not depend on `var`.
    ///
    /// # Errors
    /// [Error::NotAVariable] if `var` was not created by [DualVector::var].
    pub fn partial(&self, var: &DualVector) -> Result<Elementwise<f64>, Error> {
        let id = var.id.ok_or(Error::NotAVariable)?;
        Ok(self
            .jacobian
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.value.iter().map(|_| 0.0).collect()))
    }
}

impl Index<usize> for DualVector {
    type Output = Dual;

    /// # Panics
    /// Panics if `index` is out of range.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}

// impls
impl DualVector {
    fn _chain(&self, value: Elementwise<f64>, der: &Elementwise<f64>) -> Self {
        let jacobian = self
            .jacobian
            .iter()
            .map(|(k, v)| (*k, v.clone() * der))
            .collect();
        Self::_new(value, None, jacobian)
    }

    fn _combine(
        &self,
        rhs: &Self,
        value: Elementwise<f64>,
        lder: &Elementwise<f64>,
        rder: &Elementwise<f64>,
    ) -> Self {
        let mut jacobian: BTreeMap<_, _> = self
            .jacobian
            .iter()
            .map(|(k, v)| (*k, v.clone() * lder))
            .collect();
        for (k, v) in &rhs.jacobian {
            let d = v.clone() * rder;
            match jacobian.entry(*k) {
                Entry::Occupied(mut e) => *e.get_mut() += &d,
                Entry::Vacant(e) => {
                    e.insert(d);
                }
            }
        }
        Self::_new(value, None, jacobian)
    }

    fn _unary(&self, f: impl Fn(f64) -> (f64, f64)) -> Self {
        let (value, der): (Vec<f64>, Vec<f64>) = self.value.iter().map(|x| f(*x)).unzip();
        self._chain(value.into(), &der.into())
    }
}

type _Zipped = (Elementwise<f64>, Elementwise<f64>, Elementwise<f64>);

/// Value and both local derivatives of `f` element by element.
///
/// # Panics
/// Panics if the lengths differ.
fn _zip3(op: &str, lhs: &[f64], rhs: &[f64], f: impl Fn(f64, f64) -> (f64, f64, f64)) -> _Zipped {
    if lhs.len() != rhs.len() {
        panic!(
            "Cannot {} dual vectors of different lengths (lhs={}, rhs={})",
            op,
            lhs.len(),
            rhs.len()
        );
    }
    let mut value = Vec::with_capacity(lhs.len());
    let mut lder = Vec::with_capacity(lhs.len());
    let mut rder = Vec::with_capacity(lhs.len());
    for (l, r) in lhs.iter().zip(rhs) {
        let (v, ld, rd) = f(*l, *r);
        value.push(v);
        lder.push(ld);
        rder.push(rd);
    }
    (value.into(), lder.into(), rder.into())
}

/// Constants usable with a [DualVector] of length `len`.
trait _IntoElems {
    fn _into_elems(self, len: usize) -> Elementwise<f64>;
}

impl _IntoElems for f64 {
    #[inline]
    fn _into_elems(self, len: usize) -> Elementwise<f64> {
        vec![self; len].into()
    }
}

impl _IntoElems for Elementwise<f64> {
    #[inline]
    fn _into_elems(self, _: usize) -> Elementwise<f64> {
        self
    }
}

impl _IntoElems for &Elementwise<f64> {
    #[inline]
    fn _into_elems(self, _: usize) -> Elementwise<f64> {
        self.clone()
    }
}

//
// arithmetic operations
//
impl Neg for &DualVector {
    type Output = DualVector;

    #[inline]
    fn neg(self) -> Self::Output {
        self._unary(|x| (-x, -1.0))
    }
}

impl Neg for DualVector {
    type Output = DualVector;

    #[inline]
    fn neg(self) -> Self::Output {
        Neg::neg(&self)
    }
}

macro_rules! _define_dual_vector_binary_const {
    ($tr:ident, $fn:ident, $f:expr; $($c:ty),*) => {
        $(
            impl $tr<$c> for &DualVector {
                type Output = DualVector;

                #[inline]
                fn $fn(self, rhs: $c) -> Self::Output {
                    let rhs = rhs._into_elems(self.len());
                    let (value, lder, _) = _zip3(stringify!($fn), &self.value, &rhs, $f);
                    self._chain(value, &lder)
                }
            }

            impl $tr<$c> for DualVector {
                type Output = DualVector;

                #[inline]
                fn $fn(self, rhs: $c) -> Self::Output {
                    $tr::$fn(&self, rhs)
                }
            }

            impl $tr<&DualVector> for $c {
                type Output = DualVector;

                #[inline]
                fn $fn(self, rhs: &DualVector) -> Self::Output {
                    let lhs = self._into_elems(rhs.len());
                    let (value, _, rder) = _zip3(stringify!($fn), &lhs, &rhs.value, $f);
                    rhs._chain(value, &rder)
                }
            }

            impl $tr<DualVector> for $c {
                type Output = DualVector;

                #[inline]
                fn $fn(self, rhs: DualVector) -> Self::Output {
                    $tr::$fn(self, &rhs)
                }
            }
        )*
    };
}

macro_rules! _define_dual_vector_binary {
    ($tr:ident, $fn:ident, $f:expr) => {
        impl $tr<&DualVector> for &DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self, rhs: &DualVector) -> Self::Output {
                let (value, lder, rder) = _zip3(stringify!($fn), &self.value, &rhs.value, $f);
                self._combine(rhs, value, &lder, &rder)
            }
        }

        impl $tr<DualVector> for DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self, rhs: DualVector) -> Self::Output {
                $tr::$fn(&self, &rhs)
            }
        }

        impl $tr<&DualVector> for DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self, rhs: &DualVector) -> Self::Output {
                $tr::$fn(&self, rhs)
            }
        }

        impl $tr<DualVector> for &DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self, rhs: DualVector) -> Self::Output {
                $tr::$fn(self, &rhs)
            }
        }

        _define_dual_vector_binary_const!(
            $tr, $fn, $f;
            f64, Elementwise<f64>, &Elementwise<f64>
        );
    };
}

_define_dual_vector_binary!(Add, add, |l: f64, r: f64| (l + r, 1.0, 1.0));
_define_dual_vector_binary!(Sub, sub, |l: f64, r: f64| (l - r, 1.0, -1.0));
_define_dual_vector_binary!(Mul, mul, |l: f64, r: f64| (l * r, r, l));
_define_dual_vector_binary!(Div, div, |l: f64, r: f64| (l / r, 1.0 / r, -l / (r * r)));
_define_dual_vector_binary!(Pow, pow, |l: f64, r: f64| {
    let value = l.powf(r);
    (value, r * l.powf(r - 1.0), value * l.ln())
});

//
// elementary functions
//
macro_rules! _define_dual_vector_unary {
    ($tr:ident, $fn:ident, |$x:ident| $der:expr) => {
        impl $tr for &DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self) -> Self::Output {
                self._unary(|$x: f64| ($tr::$fn($x), $der))
            }
        }

        impl $tr for DualVector {
            type Output = DualVector;

            #[inline]
            fn $fn(self) -> Self::Output {
                $tr::$fn(&self)
            }
        }
    };
}

_define_dual_vector_unary!(Sqrt, sqrt, |x| 0.5 / x.sqrt());
_define_dual_vector_unary!(Exp, exp, |x| x.exp());
_define_dual_vector_unary!(Log, log, |x| 1.0 / x);
_define_dual_vector_unary!(Erf, erf, |x| std::f64::consts::FRAC_2_SQRT_PI
    * (-x * x).exp());
_define_dual_vector_unary!(Sin, sin, |x| x.cos());
_define_dual_vector_unary!(Cos, cos, |x| -x.sin());
_define_dual_vector_unary!(Tan, tan, |x| 1.0 / (x.cos() * x.cos()));
_define_dual_vector_unary!(Asin, asin, |x| 1.0 / (1.0 - x * x).sqrt());
_define_dual_vector_unary!(Acos, acos, |x| -1.0 / (1.0 - x * x).sqrt());
_define_dual_vector_unary!(Atan, atan, |x| 1.0 / (1.0 + x * x));
_define_dual_vector_unary!(Sinh, sinh, |x| x.cosh());
_define_dual_vector_unary!(Cosh, cosh, |x| x.sinh());
_define_dual_vector_unary!(Tanh, tanh, |x| 1.0 - x.tanh() * x.tanh());
_define_dual_vector_unary!(Asinh, asinh, |x| 1.0 / (x * x + 1.0).sqrt());
_define_dual_vector_unary!(Acosh, acosh, |x| 1.0 / (x * x - 1.0).sqrt());
_define_dual_vector_unary!(Atanh, atanh, |x| 1.0 / (1.0 - x * x));

impl LogBase for &DualVector {
    type Base = f64;
    type Output = DualVector;

    #[inline]
    fn log_base(self, base: f64) -> Self::Output {
        let ln_base = base.ln();
        self._unary(|x| (x.ln() / ln_base, 1.0 / (x * ln_base)))
    }
}

impl LogBase for DualVector {
    type Base = f64;
    type Output = DualVector;

    #[inline]
    fn log_base(self, base: f64) -> Self::Output {
        LogBase::log_base(&self, base)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use crate::op;

    use super::*;

    #[test]
    fn test_var() {
        let v = DualVector::var([1.0, 2.0]).unwrap();
        let w = DualVector::var([1.0, 2.0]).unwrap();

        assert!(v.is_var());
        assert_ne!(v.id(), w.id());
        assert_eq!(v.len(), 2);
        assert_eq!(v.partial(&v).unwrap(), Elementwise::from([1.0, 1.0]));
        assert_eq!(v.partial(&w).unwrap(), Elementwise::from([0.0, 0.0]));
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            DualVector::var(Vec::<f64>::new()).unwrap_err(),
            Error::EmptyVector
        );
        assert_eq!(
            DualVector::constant(Vec::<f64>::new()).unwrap_err(),
            Error::EmptyVector
        );
    }

    #[test]
    fn test_constant() {
        let c = DualVector::constant([3.0]).unwrap();
        let v = DualVector::var([1.0]).unwrap();

        assert!(!c.is_var());
        assert!(c.jacobian().is_empty());
        assert_eq!(c.partial(&v).unwrap(), Elementwise::from([0.0]));
        assert_eq!(v.partial(&c), Err(Error::NotAVariable));
    }

    #[rstest]
    #[case([1.5, -0.5], [2.0, 4.0])]
    #[case([0.25, 3.0], [-1.0, 0.5])]
    fn test_arithmetic(#[case] a: [f64; 2], #[case] b: [f64; 2]) {
        let x = DualVector::var(a).unwrap();
        let y = DualVector::var(b).unwrap();

        let z = (&x + &y) * (&x - &y) / &y;

        let dx = z.partial(&x).unwrap();
        let dy = z.partial(&y).unwrap();
        for i in 0..2 {
            let (a, b) = (a[i], b[i]);
            assert_abs_diff_eq!(z.value()[i], (a * a - b * b) / b, epsilon = 1e-14);
            assert_abs_diff_eq!(dx[i], 2.0 * a / b, epsilon = 1e-14);
            assert_abs_diff_eq!(dy[i], -1.0 - a * a / (b * b), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_constants() {
        let x = DualVector::var([2.0, 4.0]).unwrap();
        let c = Elementwise::from([1.0, -1.0]);

        assert_eq!((&x * 3.0).partial(&x).unwrap(), Elementwise::from([3.0, 3.0]));
        assert_eq!((&x * &c).partial(&x).unwrap(), c);
        assert_eq!((5.0 - &x).partial(&x).unwrap(), Elementwise::from([-1.0, -1.0]));
        assert_eq!((4.0 / &x).partial(&x).unwrap(), Elementwise::from([-1.0, -0.25]));
        assert_eq!((-&x).partial(&x).unwrap(), Elementwise::from([-1.0, -1.0]));
        assert_eq!(
            (c.clone() + x.clone()).value(),
            &Elementwise::from([3.0, 3.0])
        );
        let p = 2.0f64.pow(&x);
        assert_abs_diff_eq!(p.partial(&x).unwrap()[0], 4.0 * 2f64.ln(), epsilon = 1e-14);
    }

    #[test]
    #[should_panic(expected = "Cannot add dual vectors of different lengths (lhs=2, rhs=1)")]
    fn test_length_mismatch() {
        let x = DualVector::var([1.0, 2.0]).unwrap();
        let y = DualVector::var([1.0]).unwrap();

        let _ = &x + &y;
    }

    #[test]
    fn test_component() {
        let v = DualVector::var([0.5, 1.5]).unwrap();

        assert_eq!(v.component(1).unwrap().value(), 1.5);
        assert_eq!(v[0].value(), 0.5);
        assert_eq!(
            v.component(2).unwrap_err(),
            Error::ComponentOutOfRange { index: 2, len: 2 }
        );

        // components are independent of the vector and of each other
        let s = op::sin(&v[0]) * &v[1];
        assert_eq!(s.partial(&v[1]).unwrap(), 0.5f64.sin());
        assert_eq!(v.partial(&v).unwrap()[0], 1.0);
        assert!(v[0].is_var());
        assert_ne!(v[0].id(), v[1].id());
    }

    #[rstest]
    #[case(0.3)]
    #[case(-0.7)]
    fn test_elementary_matches_scalar(#[case] input: f64) {
        let v = DualVector::var([input, input / 2.0]).unwrap();

        let y = op::tanh(op::exp(&v)) + op::arctan(&v) * op::cos(&v);

        let grad = y.partial(&v).unwrap();
        for (i, x) in [input, input / 2.0].into_iter().enumerate() {
            let d = Dual::var(x);
            let s = op::tanh(op::exp(&d)) + op::arctan(&d) * op::cos(&d);

            assert_eq!(y.value()[i], s.value());
            assert_abs_diff_eq!(grad[i], s.partial(&d).unwrap(), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_log_base() {
        let v = DualVector::var([2.0, 8.0]).unwrap();

        let y = op::log(&v, 2.0);

        assert_abs_diff_eq!(y.value()[1], 3.0, epsilon = 1e-15);
        let grad = y.partial(&v).unwrap();
        assert_abs_diff_eq!(grad[0], 1.0 / (2.0 * 2f64.ln()), epsilon = 1e-15);
        assert_abs_diff_eq!(grad[1], 1.0 / (8.0 * 2f64.ln()), epsilon = 1e-15);
    }
}
