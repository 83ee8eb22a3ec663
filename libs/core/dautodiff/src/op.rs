//! Elementary functions over nodes and plain numbers.
//!
//! Every function dispatches on its argument through the traits of [dmath::num]:
//! - [ScalarNode], [VectorNode], [Dual] and [DualVector] arguments give a new
//!   differentiable value.
//! - Plain `f64`, `f32` and [Elementwise] arguments give the plain result
//!   and never touch a graph.
//!
//! Domain errors follow IEEE-754, e.g. `op::ln(-1.0)` is `NaN`.
//!
//! # Example
//! ```
//! use dautodiff::{op, Graph};
//!
//! let graph = Graph::new();
//! let x = graph.scalar(0.5);
//!
//! let y = op::sin(&x);
//! let c = op::sin(0.5f64);
//!
//! assert_eq!(y.value(), c);
//! assert_eq!(y.partial(&x).unwrap(), 0.5f64.cos());
//! ```
//!
//! [Dual]: crate::forward::Dual
//! [DualVector]: crate::forward::DualVector
//! [Elementwise]: dmath::num::Elementwise
use dmath::num::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Erf, Exp, Log, LogBase, Pow, Sin, Sinh, Sqrt,
    Tan, Tanh,
};

use crate::{graph::_Handle, ScalarNode, VectorNode};

// -----------------------------------------------------------------------------
// Functions
// -----------------------------------------------------------------------------
macro_rules! _define_op_fn {
    ($(#[$meta:meta])* $name:ident, $tr:ident, $method:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $name<X: $tr>(x: X) -> X::Output {
            x.$method()
        }
    };
}

_define_op_fn!(sin, Sin, sin);
_define_op_fn!(cos, Cos, cos);
_define_op_fn!(tan, Tan, tan);
_define_op_fn!(arcsin, Asin, asin);
_define_op_fn!(arccos, Acos, acos);
_define_op_fn!(arctan, Atan, atan);
_define_op_fn!(sinh, Sinh, sinh);
_define_op_fn!(cosh, Cosh, cosh);
_define_op_fn!(tanh, Tanh, tanh);
_define_op_fn!(arcsinh, Asinh, asinh);
_define_op_fn!(arccosh, Acosh, acosh);
_define_op_fn!(arctanh, Atanh, atanh);
_define_op_fn!(exp, Exp, exp);
_define_op_fn!(sqrt, Sqrt, sqrt);
_define_op_fn!(erf, Erf, erf);
_define_op_fn!(
    /// Natural logarithm.
    ln, Log, log
);

/// Logarithm of `x` in `base`, `ln(x) / ln(base)`.
#[inline]
pub fn log<X: LogBase>(x: X, base: X::Base) -> X::Output {
    x.log_base(base)
}

/// `x` to the power `exp`. Either side may be a node.
#[inline]
pub fn pow<X: Pow<E>, E>(x: X, exp: E) -> X::Output {
    x.pow(exp)
}

// -----------------------------------------------------------------------------
// Node implementations
// -----------------------------------------------------------------------------
macro_rules! _impl_elementary_for_node {
    ($node:ident: $(($tr:ident, $method:ident, $rule:ident)),* $(,)?) => {
        $(
            impl $tr for &$node {
                type Output = $node;

                #[inline]
                fn $method(self) -> Self::Output {
                    $node::_wrap(self._node().$rule())
                }
            }

            impl $tr for $node {
                type Output = $node;

                #[inline]
                fn $method(self) -> Self::Output {
                    $tr::$method(&self)
                }
            }
        )*

        impl LogBase for &$node {
            type Base = f64;
            type Output = $node;

            #[inline]
            fn log_base(self, base: f64) -> Self::Output {
                $node::_wrap(self._node()._log_base(base))
            }
        }

        impl LogBase for $node {
            type Base = f64;
            type Output = $node;

            #[inline]
            fn log_base(self, base: f64) -> Self::Output {
                LogBase::log_base(&self, base)
            }
        }
    };
}

macro_rules! _impl_all_elementary_for_node {
    ($($node:ident),*) => {
        $(
            _impl_elementary_for_node!(
                $node:
                (Sqrt, sqrt, _sqrt),
                (Exp, exp, _exp),
                (Log, log, _ln),
                (Erf, erf, _erf),
                (Sin, sin, _sin),
                (Cos, cos, _cos),
                (Tan, tan, _tan),
                (Asin, asin, _asin),
                (Acos, acos, _acos),
                (Atan, atan, _atan),
                (Sinh, sinh, _sinh),
                (Cosh, cosh, _cosh),
                (Tanh, tanh, _tanh),
                (Asinh, asinh, _asinh),
                (Acosh, acosh, _acosh),
                (Atanh, atanh, _atanh),
            );
        )*
    };
}

_impl_all_elementary_for_node!(ScalarNode, VectorNode);

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use dmath::num::Elementwise;
    use rstest::rstest;
    use static_assertions::assert_type_eq_all;

    use crate::Graph;

    use super::*;

    assert_type_eq_all!(<f64 as Sin>::Output, f64);
    assert_type_eq_all!(<&'static ScalarNode as Sin>::Output, ScalarNode);
    assert_type_eq_all!(<&'static VectorNode as LogBase>::Output, VectorNode);
    assert_type_eq_all!(<Elementwise<f64> as Exp>::Output, Elementwise<f64>);

    type Case = (
        fn(&ScalarNode) -> ScalarNode,
        fn(f64) -> f64,
        fn(f64) -> f64,
    );

    fn _cases() -> [(&'static str, Case); 13] {
        [
            ("sin", (|x| sin(x), |x| sin(x), |x| x.cos())),
            ("cos", (|x| cos(x), |x| cos(x), |x| -x.sin())),
            ("tan", (|x| tan(x), |x| tan(x), |x| 1.0 / (x.cos() * x.cos()))),
            ("arcsin", (|x| arcsin(x), |x| arcsin(x), |x| 1.0 / (1.0 - x * x).sqrt())),
            ("arccos", (|x| arccos(x), |x| arccos(x), |x| -1.0 / (1.0 - x * x).sqrt())),
            ("arctan", (|x| arctan(x), |x| arctan(x), |x| 1.0 / (1.0 + x * x))),
            ("sinh", (|x| sinh(x), |x| sinh(x), |x| x.cosh())),
            ("cosh", (|x| cosh(x), |x| cosh(x), |x| x.sinh())),
            ("tanh", (|x| tanh(x), |x| tanh(x), |x| 1.0 - x.tanh() * x.tanh())),
            ("arcsinh", (|x| arcsinh(x), |x| arcsinh(x), |x| 1.0 / (x * x + 1.0).sqrt())),
            ("arctanh", (|x| arctanh(x), |x| arctanh(x), |x| 1.0 / (1.0 - x * x))),
            ("exp", (|x| exp(x), |x| exp(x), |x| x.exp())),
            ("erf", (|x| erf(x), |x| erf(x), |x| {
                std::f64::consts::FRAC_2_SQRT_PI * (-x * x).exp()
            })),
        ]
    }

    #[rstest]
    #[case(0.1)]
    #[case(0.5)]
    #[case(-0.75)]
    fn test_scalar_functions(#[case] input: f64) {
        for (name, (node_fn, float_fn, der_fn)) in _cases() {
            let graph = Graph::new();
            let x = graph.scalar(input);

            let y = node_fn(&x);

            assert_eq!(y.value(), float_fn(input), "value of {name}");
            assert_abs_diff_eq!(y.partial(&x).unwrap(), der_fn(input), epsilon = 1e-12);
        }
    }

    #[rstest]
    #[case(1.5)]
    #[case(4.0)]
    fn test_positive_domain_functions(#[case] input: f64) {
        let graph = Graph::new();
        let x = graph.scalar(input);

        let s = sqrt(&x);
        let l = ln(&x);
        let l10 = log(&x, 10.0);
        let h = arccosh(&x);

        assert_eq!(s.value(), input.sqrt());
        assert_abs_diff_eq!(s.partial(&x).unwrap(), 0.5 / input.sqrt(), epsilon = 1e-14);
        assert_eq!(l.value(), input.ln());
        assert_abs_diff_eq!(l.partial(&x).unwrap(), 1.0 / input, epsilon = 1e-14);
        assert_eq!(l10.value(), log(input, 10.0));
        assert_abs_diff_eq!(l10.value(), input.log10(), epsilon = 1e-14);
        assert_abs_diff_eq!(
            l10.partial(&x).unwrap(),
            1.0 / (input * 10f64.ln()),
            epsilon = 1e-14
        );
        assert_eq!(h.value(), input.acosh());
        assert_abs_diff_eq!(
            h.partial(&x).unwrap(),
            1.0 / (input * input - 1.0).sqrt(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_constant_short_circuit() {
        let s: f64 = sin(3.0f64);
        let f: f32 = exp(1.0f32);
        let e: Elementwise<f64> = cos(Elementwise::from([0.0, 1.0]));
        let l: f64 = log(8.0f64, 2.0);

        assert_eq!(s, 3.0f64.sin());
        assert_eq!(f, 1.0f32.exp());
        assert_eq!(e, Elementwise::from([1.0, 1.0f64.cos()]));
        assert_abs_diff_eq!(l, 3.0, epsilon = 1e-15);
        assert_eq!(pow(2.0f64, 3.0f64), 8.0);
    }

    #[test]
    fn test_domain_errors() {
        let graph = Graph::new();
        let x = graph.scalar(-1.0);

        assert!(ln(&x).value().is_nan());
        assert!(sqrt(&x).value().is_nan());
        assert!(arccosh(&x).value().is_nan());
        assert!(ln(-1.0f64).is_nan());
        assert!(arcsin(2.0f64).is_nan());
    }

    #[test]
    fn test_owned_argument() {
        let graph = Graph::new();
        let x = graph.scalar(0.3);

        let y = sin(x.clone() * 2.0);

        assert_eq!(y.value(), 0.6f64.sin());
        assert_abs_diff_eq!(y.partial(&x).unwrap(), 2.0 * 0.6f64.cos(), epsilon = 1e-15);
    }

    #[test]
    fn test_vector_matches_components() {
        let graph = Graph::new();
        let v = graph.vector([0.6, -0.2, 1.3]).unwrap();

        let y = tanh(&v);
        let grad = y.partial(&v).unwrap();

        for i in 0..v.len() {
            assert_eq!(y[i].value(), tanh(v[i].value()));
            let s = tanh(&v[i]);
            assert_eq!(s.value(), y[i].value());
            assert_abs_diff_eq!(s.partial(&v[i]).unwrap(), grad[i], epsilon = 1e-15);
        }
    }

    #[test]
    fn test_vector_log() {
        let graph = Graph::new();
        let v = graph.vector([2.0, 8.0]).unwrap();

        let y = log(&v, 2.0);

        assert_abs_diff_eq!(y.value()[0], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(y.value()[1], 3.0, epsilon = 1e-15);
        let grad = y.partial(&v).unwrap();
        assert_abs_diff_eq!(grad[0], 1.0 / (2.0 * 2f64.ln()), epsilon = 1e-15);
        assert_abs_diff_eq!(grad[1], 1.0 / (8.0 * 2f64.ln()), epsilon = 1e-15);
    }
}
