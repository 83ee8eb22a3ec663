use std::ops::{Add, Div, Mul, Neg, Sub};

use dmath::num::{Elementwise, Numeric, Pow};

use crate::{
    graph::{Node, Operand, _Handle},
    ScalarNode, VectorNode,
};

// -----------------------------------------------------------------------------
// _IntoConst
// -----------------------------------------------------------------------------
/// Constants accepted as operands of nodes with values of type `V`.
trait _IntoConst<V> {
    fn _into_const(self, like: &Node<V>) -> V;
}

impl _IntoConst<f64> for f64 {
    #[inline]
    fn _into_const(self, _: &Node<f64>) -> f64 {
        self
    }
}

impl _IntoConst<Elementwise<f64>> for f64 {
    #[inline]
    fn _into_const(self, like: &Node<Elementwise<f64>>) -> Elementwise<f64> {
        like._indirectly_read(|v| v.full_like(self))
    }
}

impl _IntoConst<Elementwise<f64>> for Elementwise<f64> {
    #[inline]
    fn _into_const(self, _: &Node<Elementwise<f64>>) -> Elementwise<f64> {
        self
    }
}

impl _IntoConst<Elementwise<f64>> for &Elementwise<f64> {
    #[inline]
    fn _into_const(self, _: &Node<Elementwise<f64>>) -> Elementwise<f64> {
        self.clone()
    }
}

// -----------------------------------------------------------------------------
// Operators
// -----------------------------------------------------------------------------
macro_rules! _define_node_binary {
    ($node:ident, $tr:ident, $fn:ident, $rule:ident, $rrule:ident; $($cnst:ty),*) => {
        impl $tr<&$node> for &$node {
            type Output = $node;

            #[inline]
            fn $fn(self, rhs: &$node) -> Self::Output {
                $node::_wrap(self._node().$rule(Operand::Node(rhs._node())))
            }
        }

        impl $tr<$node> for &$node {
            type Output = $node;

            #[inline]
            fn $fn(self, rhs: $node) -> Self::Output {
                $tr::$fn(self, &rhs)
            }
        }

        impl $tr<&$node> for $node {
            type Output = $node;

            #[inline]
            fn $fn(self, rhs: &$node) -> Self::Output {
                $tr::$fn(&self, rhs)
            }
        }

        impl $tr<$node> for $node {
            type Output = $node;

            #[inline]
            fn $fn(self, rhs: $node) -> Self::Output {
                $tr::$fn(&self, &rhs)
            }
        }

        $(
            impl $tr<$cnst> for &$node {
                type Output = $node;

                #[inline]
                fn $fn(self, rhs: $cnst) -> Self::Output {
                    let node = self._node();
                    $node::_wrap(node.$rule(Operand::Const(rhs._into_const(node))))
                }
            }

            impl $tr<$cnst> for $node {
                type Output = $node;

                #[inline]
                fn $fn(self, rhs: $cnst) -> Self::Output {
                    $tr::$fn(&self, rhs)
                }
            }

            impl $tr<&$node> for $cnst {
                type Output = $node;

                #[inline]
                fn $fn(self, rhs: &$node) -> Self::Output {
                    let node = rhs._node();
                    $node::_wrap(node.$rrule(self._into_const(node)))
                }
            }

            impl $tr<$node> for $cnst {
                type Output = $node;

                #[inline]
                fn $fn(self, rhs: $node) -> Self::Output {
                    $tr::$fn(self, &rhs)
                }
            }
        )*
    };
}

macro_rules! _define_node_arithmetic {
    ($node:ident; $($cnst:ty),*) => {
        impl Neg for &$node {
            type Output = $node;

            #[inline]
            fn neg(self) -> Self::Output {
                $node::_wrap(self._node()._neg())
            }
        }

        impl Neg for $node {
            type Output = $node;

            #[inline]
            fn neg(self) -> Self::Output {
                Neg::neg(&self)
            }
        }

        _define_node_binary!($node, Add, add, _add, _radd; $($cnst),*);
        _define_node_binary!($node, Sub, sub, _sub, _rsub; $($cnst),*);
        _define_node_binary!($node, Mul, mul, _mul, _rmul; $($cnst),*);
        _define_node_binary!($node, Div, div, _div, _rdiv; $($cnst),*);
        _define_node_binary!($node, Pow, pow, _pow, _rpow; $($cnst),*);
    };
}

_define_node_arithmetic!(ScalarNode; f64);
_define_node_arithmetic!(VectorNode; f64, Elementwise<f64>, &Elementwise<f64>);
