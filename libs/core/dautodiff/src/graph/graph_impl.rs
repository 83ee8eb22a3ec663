use std::{cell::RefCell, rc::Rc};

use dmath::num::Elementwise;

use crate::{Error, ScalarNode, VectorNode};

use super::{tape::_Tape, Node};

// -----------------------------------------------------------------------------
// _Graph
// Graph
// -----------------------------------------------------------------------------
/// One tape per rank. Components of vector nodes live on the scalar tape.
#[derive(Debug, Default)]
pub(crate) struct _Graph {
    pub(crate) scalars: _Tape<f64>,
    pub(crate) vectors: _Tape<Elementwise<f64>>,
}

/// Arena owning every node created through it.
///
/// A [Graph] is a cheap handle: clones share the same arena.
/// Nodes keep their graph alive, so values and gradients stay reachable
/// as long as any node or handle exists.
///
/// Nodes from different graphs can not be combined.
#[derive(Debug)]
pub struct Graph(pub(crate) Rc<RefCell<_Graph>>);

impl Clone for Graph {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

//
// ctor
//
impl Default for Graph {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    #[inline]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(_Graph::default())))
    }
}

// methods
impl Graph {
    /// Create a scalar variable which belongs to this graph.
    #[inline]
    pub fn scalar(&self, value: f64) -> ScalarNode {
        ScalarNode(Node::_leaf(self, value))
    }

    /// Create a vector variable which belongs to this graph.
    ///
    /// Each element is also registered as a scalar variable,
    /// available through [VectorNode::component].
    ///
    /// # Errors
    /// [Error::EmptyVector] if `values` has no element.
    #[inline]
    pub fn vector(&self, values: impl Into<Elementwise<f64>>) -> Result<VectorNode, Error> {
        VectorNode::_create(self, values.into())
    }

    /// Check that two graphs are the same instance.
    ///
    /// Note that this comparison is not based on the contents of the graphs.
    #[inline]
    pub fn ptr_eq(lhs: &Self, rhs: &Self) -> bool {
        Rc::ptr_eq(&lhs.0, &rhs.0)
    }

    pub fn stats(&self) -> GraphStats {
        let graph = self.0.borrow();
        GraphStats {
            scalar_nodes: graph.scalars._len(),
            vector_nodes: graph.vectors._len(),
            scalar_accumulations: graph.scalars._accumulations(),
            vector_accumulations: graph.vectors._accumulations(),
        }
    }
}

// impls
impl Graph {
    #[inline]
    pub(crate) fn _debug_ptr(&self) -> impl std::fmt::Debug {
        self.0.as_ptr()
    }
}

// -----------------------------------------------------------------------------
// GraphStats
// -----------------------------------------------------------------------------
/// Snapshot of the size of a [Graph] and the work done by gradient queries.
///
/// `*_accumulations` count gradients actually computed.
/// Queries answered from the cache do not increase them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStats {
    pub scalar_nodes: usize,
    pub vector_nodes: usize,
    pub scalar_accumulations: usize,
    pub vector_accumulations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let graph = Graph::new();

        let x = graph.scalar(4.2);

        assert_eq!(x.value(), 4.2);
        assert!(Graph::ptr_eq(x.graph(), &graph));
    }

    #[test]
    fn test_vector() {
        let graph = Graph::new();

        let x = graph.vector([1.0, 2.0, 3.0]).unwrap();

        assert_eq!(x.value(), Elementwise::from([1.0, 2.0, 3.0]));
        assert_eq!(
            graph.stats(),
            GraphStats {
                scalar_nodes: 3,
                vector_nodes: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_vector_err_empty() {
        let graph = Graph::new();

        let err = graph.vector(Vec::<f64>::new());

        assert_eq!(err.unwrap_err(), Error::EmptyVector);
        assert_eq!(graph.stats(), GraphStats::default());
    }

    #[test]
    fn test_ptr_eq() {
        let graph1 = Graph::new();
        let graph2 = graph1.clone();

        assert!(Graph::ptr_eq(&graph1, &graph2));
    }

    #[test]
    fn test_ptr_neq() {
        let graph1 = Graph::new();
        let graph2 = Graph::new();

        assert!(!Graph::ptr_eq(&graph1, &graph2));
    }

    #[test]
    fn test_stats() {
        let graph = Graph::new();
        let x = graph.scalar(2.0);
        let y = &x * &x + 1.0;

        assert_eq!(graph.stats().scalar_nodes, 3);

        y.backward();
        let _ = x.gradient();
        let _ = x.gradient();

        // `x` and `x * x` are computed once, `y` is the seed
        assert_eq!(graph.stats().scalar_accumulations, 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stats_serde() {
        let stats = GraphStats {
            scalar_nodes: 3,
            vector_nodes: 1,
            scalar_accumulations: 2,
            vector_accumulations: 0,
        };

        let json = serde_json::to_string(&stats).unwrap();

        assert_eq!(
            json,
            r#"{"scalar_nodes":3,"vector_nodes":1,"scalar_accumulations":2,"vector_accumulations":0}"#
        );
    }
}
