use crate::{
    graph::{Graph, Node, _Handle},
    Error,
};

// -----------------------------------------------------------------------------
// ScalarNode
// -----------------------------------------------------------------------------
/// Differentiable scalar living in a [Graph].
///
/// Arithmetic operators and the functions in [crate::op] record a new node
/// and the local derivatives to its operands.
/// Cloning a [ScalarNode] gives another handle to the same node.
///
/// # Example
/// ```
/// use dautodiff::{op, Graph};
///
/// let graph = Graph::new();
/// let x = graph.scalar(3.0);
///
/// let z = &x * 2.0 + op::pow(&x, 2.0);
///
/// assert_eq!(z.value(), 15.0);
/// assert_eq!(z.partial(&x).unwrap(), 8.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScalarNode(pub(crate) Node<f64>);

impl ScalarNode {
    #[inline]
    pub fn value(&self) -> f64 {
        self.0._value()
    }

    /// Gradient of the seeded node with respect to this node.
    ///
    /// Zero if nothing in the graph is seeded or if the seeded node
    /// does not depend on this node.
    #[inline]
    pub fn gradient(&self) -> f64 {
        self.0._gradient()
    }

    /// Seed this node with `1`, making it the objective of [ScalarNode::gradient].
    #[inline]
    pub fn backward(&self) {
        self.seed_gradient(1.0);
    }

    /// Seed this node with `seed`, replacing any seed previously given on the scalar tape.
    #[inline]
    pub fn seed_gradient(&self, seed: f64) {
        self.0._seed(seed);
    }

    /// Derivative of this node with respect to `var`.
    ///
    /// Seeds this node with `1` and reads the gradient of `var`.
    ///
    /// # Errors
    /// [Error::DifferentGraphs] if `var` belongs to another graph.
    pub fn partial(&self, var: &ScalarNode) -> Result<f64, Error> {
        if !Graph::ptr_eq(self.graph(), var.graph()) {
            return Err(Error::DifferentGraphs("partial"));
        }
        self.backward();
        Ok(var.gradient())
    }

    /// Number of nodes computed directly from this one.
    #[inline]
    pub fn fan_out(&self) -> usize {
        self.0._fan_out()
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        self.0._graph()
    }

    #[cfg(test)]
    pub(crate) fn _index(&self) -> usize {
        self.0._index()
    }
}

impl _Handle for ScalarNode {
    type Value = f64;

    #[inline]
    fn _node(&self) -> &Node<f64> {
        &self.0
    }

    #[inline]
    fn _wrap(node: Node<f64>) -> Self {
        Self(node)
    }
}
