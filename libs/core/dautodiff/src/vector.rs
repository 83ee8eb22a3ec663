use std::{ops::Index, rc::Rc};

use dmath::num::{Elementwise, Numeric};

use crate::{
    graph::{Graph, Node, _Handle},
    Error, ScalarNode,
};

// -----------------------------------------------------------------------------
// VectorNode
// -----------------------------------------------------------------------------
/// Differentiable one dimensional array living in a [Graph].
///
/// Operations act element by element and record a single node on the vector tape.
/// Every vector node, including operation results, also exposes its elements
/// as scalar leaves through [VectorNode::component] and indexing.
/// These components start new scalar computations.
/// They are not connected to the vector node they come from.
///
/// # Example
/// ```
/// use dautodiff::{op, Elementwise, Graph};
///
/// let graph = Graph::new();
/// let v = graph.vector([0.6, 1.2]).unwrap();
///
/// let y = op::sin(&v);
///
/// assert_eq!(y[0].value(), 0.6f64.sin());
/// assert_eq!(y.partial(&v).unwrap(), Elementwise::from([0.6f64.cos(), 1.2f64.cos()]));
/// ```
#[derive(Debug, Clone)]
pub struct VectorNode {
    node: Node<Elementwise<f64>>,
    components: Rc<[ScalarNode]>,
}

//
// ctor
//
impl VectorNode {
    pub(crate) fn _create(graph: &Graph, values: Elementwise<f64>) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::EmptyVector);
        }
        Ok(Self::_from_node(Node::_leaf(graph, values)))
    }

    pub(crate) fn _from_node(node: Node<Elementwise<f64>>) -> Self {
        let values = node._value();
        let graph = node._graph();
        let components = values.iter().map(|v| graph.scalar(*v)).collect();
        Self { node, components }
    }
}

// methods
impl VectorNode {
    #[inline]
    pub fn value(&self) -> Elementwise<f64> {
        self.node._value()
    }

    /// Number of elements, always positive.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false` since empty vectors are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Scalar leaf holding the `index`-th element.
    ///
    /// # Errors
    /// [Error::ComponentOutOfRange] if `index >= self.len()`.
    #[inline]
    pub fn component(&self, index: usize) -> Result<ScalarNode, Error> {
        self.components
            .get(index)
            .cloned()
            .ok_or(Error::ComponentOutOfRange {
                index,
                len: self.len(),
            })
    }

    #[inline]
    pub fn components(&self) -> &[ScalarNode] {
        &self.components
    }

    /// Element-wise gradient of the seeded vector node with respect to this node.
    #[inline]
    pub fn gradient(&self) -> Elementwise<f64> {
        self.node._gradient()
    }

    /// Seed this node with ones.
    #[inline]
    pub fn backward(&self) {
        let ones = self.node._indirectly_read(Numeric::ones_like);
        self.node._seed(ones);
    }

    /// Seed this node with `seed`, replacing any seed previously given on the vector tape.
    ///
    /// # Errors
    /// [Error::LengthMismatch] if `seed` does not have the length of this node.
    pub fn seed_gradient(&self, seed: impl Into<Elementwise<f64>>) -> Result<(), Error> {
        let seed = seed.into();
        if seed.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: seed.len(),
            });
        }
        self.node._seed(seed);
        Ok(())
    }

    /// Element-wise derivative of this node with respect to `var`.
    ///
    /// Seeds this node with ones and reads the gradient of `var`.
    ///
    /// # Errors
    /// [Error::DifferentGraphs] if `var` belongs to another graph.
    pub fn partial(&self, var: &VectorNode) -> Result<Elementwise<f64>, Error> {
        if !Graph::ptr_eq(self.graph(), var.graph()) {
            return Err(Error::DifferentGraphs("partial"));
        }
        self.backward();
        Ok(var.gradient())
    }

    /// Number of nodes computed directly from this one.
    #[inline]
    pub fn fan_out(&self) -> usize {
        self.node._fan_out()
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        self.node._graph()
    }
}

impl _Handle for VectorNode {
    type Value = Elementwise<f64>;

    #[inline]
    fn _node(&self) -> &Node<Elementwise<f64>> {
        &self.node
    }

    #[inline]
    fn _wrap(node: Node<Elementwise<f64>>) -> Self {
        Self::_from_node(node)
    }
}

impl Index<usize> for VectorNode {
    type Output = ScalarNode;

    /// # Panics
    /// Panics if `index` is out of range. See [VectorNode::component] for a fallible version.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}
