use super::{node::_Ranked, Node};

// -----------------------------------------------------------------------------
// Operand
// -----------------------------------------------------------------------------
/// Right hand side of a binary operation.
///
/// A constant operand records a unary node, so no gradient flows into it.
pub(crate) enum Operand<'a, V> {
    Node(&'a Node<V>),
    Const(V),
}

// -----------------------------------------------------------------------------
// Arithmetic rules
// -----------------------------------------------------------------------------
impl<V: _Ranked> Node<V> {
    pub(crate) fn _neg(&self) -> Self {
        self._unary(|x| (-x.clone(), -x.ones_like()))
    }

    pub(crate) fn _add(&self, rhs: Operand<'_, V>) -> Self {
        match rhs {
            Operand::Node(rhs) => self._binary(rhs, "add", |l, r| {
                (l.clone() + r, l.ones_like(), r.ones_like())
            }),
            Operand::Const(c) => self._unary(|x| (x.clone() + &c, x.ones_like())),
        }
    }

    /// `self - rhs` is recorded as `self + (-rhs)`.
    pub(crate) fn _sub(&self, rhs: Operand<'_, V>) -> Self {
        match rhs {
            Operand::Node(rhs) => self._add(Operand::Node(&rhs._neg())),
            Operand::Const(c) => self._add(Operand::Const(-c)),
        }
    }

    pub(crate) fn _mul(&self, rhs: Operand<'_, V>) -> Self {
        match rhs {
            Operand::Node(rhs) => {
                self._binary(rhs, "mul", |l, r| (l.clone() * r, r.clone(), l.clone()))
            }
            Operand::Const(c) => self._unary(|x| (x.clone() * &c, c.clone())),
        }
    }

    pub(crate) fn _div(&self, rhs: Operand<'_, V>) -> Self {
        match rhs {
            Operand::Node(rhs) => self._binary(rhs, "div", |l, r| {
                let inv = r.ones_like() / r;
                let value = l.clone() / r;
                let rder = -(value.clone() * &inv);
                (value, inv, rder)
            }),
            Operand::Const(c) => self._unary(|x| (x.clone() / &c, c.ones_like() / &c)),
        }
    }

    pub(crate) fn _pow(&self, rhs: Operand<'_, V>) -> Self {
        match rhs {
            Operand::Node(rhs) => self._binary(rhs, "pow", |l, r| {
                let value = l.clone().pow(r);
                let lder = r.clone() * &l.clone().pow(&(r.clone() - &r.ones_like()));
                let rder = value.clone() * &l.clone().log();
                (value, lder, rder)
            }),
            Operand::Const(c) => self._unary(|x| {
                let der = c.clone() * &x.clone().pow(&(c.clone() - &c.ones_like()));
                (x.clone().pow(&c), der)
            }),
        }
    }

    //
    // constant on the left hand side
    //
    #[inline]
    pub(crate) fn _radd(&self, lhs: V) -> Self {
        self._add(Operand::Const(lhs))
    }

    /// `lhs - self` is recorded as `(-self) + lhs`.
    #[inline]
    pub(crate) fn _rsub(&self, lhs: V) -> Self {
        self._neg()._add(Operand::Const(lhs))
    }

    #[inline]
    pub(crate) fn _rmul(&self, lhs: V) -> Self {
        self._mul(Operand::Const(lhs))
    }

    pub(crate) fn _rdiv(&self, lhs: V) -> Self {
        self._unary(|x| {
            let value = lhs.clone() / x;
            let der = -(value.clone() / x);
            (value, der)
        })
    }

    pub(crate) fn _rpow(&self, base: V) -> Self {
        self._unary(|x| {
            let value = base.clone().pow(x);
            let der = value.clone() * &base.clone().log();
            (value, der)
        })
    }
}

// -----------------------------------------------------------------------------
// Elementary rules
// -----------------------------------------------------------------------------
impl<V: _Ranked> Node<V> {
    pub(crate) fn _sqrt(&self) -> Self {
        self._unary(|x| {
            let value = x.clone().sqrt();
            let der = x.nearest_like(0.5) / &value;
            (value, der)
        })
    }

    pub(crate) fn _exp(&self) -> Self {
        self._unary(|x| {
            let value = x.clone().exp();
            (value.clone(), value)
        })
    }

    pub(crate) fn _ln(&self) -> Self {
        self._unary(|x| (x.clone().log(), x.ones_like() / x))
    }

    /// Logarithm in `base`, `ln(x) / ln(base)`.
    pub(crate) fn _log_base(&self, base: V::BaseFloat) -> Self {
        self._unary(|x| {
            let ln_base = x.full_like(base).log();
            let value = x.clone().log() / &ln_base;
            let der = x.ones_like() / &(x.clone() * &ln_base);
            (value, der)
        })
    }

    pub(crate) fn _erf(&self) -> Self {
        self._unary(|x| {
            let coef = x.nearest_like(std::f64::consts::FRAC_2_SQRT_PI);
            let der = coef * &(-(x.clone() * x)).exp();
            (x.clone().erf(), der)
        })
    }

    pub(crate) fn _sin(&self) -> Self {
        self._unary(|x| (x.clone().sin(), x.clone().cos()))
    }

    pub(crate) fn _cos(&self) -> Self {
        self._unary(|x| (x.clone().cos(), -x.clone().sin()))
    }

    pub(crate) fn _tan(&self) -> Self {
        self._unary(|x| {
            let cos = x.clone().cos();
            (x.clone().tan(), x.ones_like() / &(cos.clone() * &cos))
        })
    }

    pub(crate) fn _asin(&self) -> Self {
        self._unary(|x| {
            let der = x.ones_like() / &(x.ones_like() - &(x.clone() * x)).sqrt();
            (x.clone().asin(), der)
        })
    }

    pub(crate) fn _acos(&self) -> Self {
        self._unary(|x| {
            let der = -(x.ones_like() / &(x.ones_like() - &(x.clone() * x)).sqrt());
            (x.clone().acos(), der)
        })
    }

    pub(crate) fn _atan(&self) -> Self {
        self._unary(|x| {
            let der = x.ones_like() / &(x.ones_like() + &(x.clone() * x));
            (x.clone().atan(), der)
        })
    }

    pub(crate) fn _sinh(&self) -> Self {
        self._unary(|x| (x.clone().sinh(), x.clone().cosh()))
    }

    pub(crate) fn _cosh(&self) -> Self {
        self._unary(|x| (x.clone().cosh(), x.clone().sinh()))
    }

    pub(crate) fn _tanh(&self) -> Self {
        self._unary(|x| {
            let value = x.clone().tanh();
            let der = x.ones_like() - &(value.clone() * &value);
            (value, der)
        })
    }

    pub(crate) fn _asinh(&self) -> Self {
        self._unary(|x| {
            let der = x.ones_like() / &(x.clone() * x + &x.ones_like()).sqrt();
            (x.clone().asinh(), der)
        })
    }

    pub(crate) fn _acosh(&self) -> Self {
        self._unary(|x| {
            let der = x.ones_like() / &(x.clone() * x - &x.ones_like()).sqrt();
            (x.clone().acosh(), der)
        })
    }

    pub(crate) fn _atanh(&self) -> Self {
        self._unary(|x| {
            let der = x.ones_like() / &(x.ones_like() - &(x.clone() * x));
            (x.clone().atanh(), der)
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use dmath::num::{Elementwise, Erf, Numeric};
    use rstest::rstest;

    use crate::Graph;

    use super::*;

    fn _grad(f: impl Fn(&Node<f64>) -> Node<f64>, x: f64) -> (f64, f64) {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, x);
        let y = f(&x);
        y._seed(1.0);
        (y._value(), x._gradient())
    }

    fn _fd(f: impl Fn(f64) -> f64, x: f64) -> f64 {
        let h = 1e-6;
        (f(x + h) - f(x - h)) / (2.0 * h)
    }

    #[rstest]
    #[case(0.3)]
    #[case(0.7)]
    #[case(-0.45)]
    fn test_unary_rules(#[case] x: f64) {
        type Case = (fn(&Node<f64>) -> Node<f64>, fn(f64) -> f64);
        let cases: [Case; 16] = [
            (|n| n._neg(), |x| -x),
            (|n| n._exp(), f64::exp),
            (|n| n._erf(), libm_erf),
            (|n| n._sin(), f64::sin),
            (|n| n._cos(), f64::cos),
            (|n| n._tan(), f64::tan),
            (|n| n._asin(), f64::asin),
            (|n| n._acos(), f64::acos),
            (|n| n._atan(), f64::atan),
            (|n| n._sinh(), f64::sinh),
            (|n| n._cosh(), f64::cosh),
            (|n| n._tanh(), f64::tanh),
            (|n| n._asinh(), f64::asinh),
            (|n| n._atanh(), f64::atanh),
            (|n| n._rdiv(2.0), |x| 2.0 / x),
            (|n| n._rpow(3.0), |x| 3f64.powf(x)),
        ];
        for (node_fn, float_fn) in cases {
            let (value, grad) = _grad(node_fn, x);

            assert_abs_diff_eq!(value, float_fn(x), epsilon = 1e-15);
            assert_abs_diff_eq!(grad, _fd(float_fn, x), epsilon = 1e-6);
        }
    }

    fn libm_erf(x: f64) -> f64 {
        Erf::erf(x)
    }

    #[rstest]
    #[case(1.5)]
    #[case(2.0)]
    #[case(7.5)]
    fn test_positive_domain_rules(#[case] x: f64) {
        type Case = (fn(&Node<f64>) -> Node<f64>, fn(f64) -> f64);
        let cases: [Case; 5] = [
            (|n| n._sqrt(), f64::sqrt),
            (|n| n._ln(), f64::ln),
            (|n| n._log_base(10.0), |x| x.ln() / 10f64.ln()),
            (|n| n._pow(Operand::Const(2.5)), |x| x.powf(2.5)),
            (|n| n._acosh(), f64::acosh),
        ];
        for (node_fn, float_fn) in cases {
            let (value, grad) = _grad(node_fn, x);

            assert_abs_diff_eq!(value, float_fn(x), epsilon = 1e-14);
            assert_abs_diff_eq!(grad, _fd(float_fn, x), epsilon = 1e-5);
        }
    }

    #[rstest]
    #[case(1.5, 2.0)]
    #[case(0.25, -3.0)]
    #[case(4.0, 0.5)]
    fn test_binary_rules(#[case] a: f64, #[case] b: f64) {
        type Case = (fn(&Node<f64>, &Node<f64>) -> Node<f64>, fn(f64, f64) -> f64);
        let cases: [Case; 5] = [
            (|l, r| l._add(Operand::Node(r)), |l, r| l + r),
            (|l, r| l._sub(Operand::Node(r)), |l, r| l - r),
            (|l, r| l._mul(Operand::Node(r)), |l, r| l * r),
            (|l, r| l._div(Operand::Node(r)), |l, r| l / r),
            (|l, r| l._pow(Operand::Node(r)), f64::powf),
        ];
        for (node_fn, float_fn) in cases {
            let graph = Graph::new();
            let l = Node::_leaf(&graph, a);
            let r = Node::_leaf(&graph, b);
            let y = node_fn(&l, &r);
            y._seed(1.0);

            assert_abs_diff_eq!(y._value(), float_fn(a, b), epsilon = 1e-14);
            assert_abs_diff_eq!(
                l._gradient(),
                _fd(|x| float_fn(x, b), a),
                epsilon = 1e-5
            );
            assert_abs_diff_eq!(
                r._gradient(),
                _fd(|x| float_fn(a, x), b),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_sub_records_negation() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, 1.0);
        let y = Node::_leaf(&graph, 2.0);

        let _ = x._sub(Operand::Node(&y));
        let _ = x._rsub(3.0);

        // leaves, -y, x + (-y), -x, (-x) + 3
        assert_eq!(graph.stats().scalar_nodes, 6);
    }

    #[test]
    fn test_elementwise_rules() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, Elementwise::from([0.5, 2.0]));

        let y = x._mul(Operand::Node(&x))._sin();
        y._seed(y._value().ones_like());

        let grad = x._gradient();
        for (g, x) in grad.iter().zip([0.5f64, 2.0]) {
            assert_abs_diff_eq!(*g, 2.0 * x * (x * x).cos(), epsilon = 1e-14);
        }
    }
}
