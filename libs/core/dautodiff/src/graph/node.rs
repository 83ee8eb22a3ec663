use std::{fmt::Debug, marker::PhantomData};

use dmath::num::{Elementwise, Numeric};

use super::{graph_impl::_Graph, tape::_Tape, Graph};

// -----------------------------------------------------------------------------
// _Ranked
// -----------------------------------------------------------------------------
/// Value types which own a tape in [_Graph].
pub(crate) trait _Ranked: Numeric {
    const RANK: &'static str;

    fn _tape(graph: &_Graph) -> &_Tape<Self>;

    fn _tape_mut(graph: &mut _Graph) -> &mut _Tape<Self>;
}

impl _Ranked for f64 {
    const RANK: &'static str = "scalar";

    #[inline]
    fn _tape(graph: &_Graph) -> &_Tape<Self> {
        &graph.scalars
    }

    #[inline]
    fn _tape_mut(graph: &mut _Graph) -> &mut _Tape<Self> {
        &mut graph.scalars
    }
}

impl _Ranked for Elementwise<f64> {
    const RANK: &'static str = "vector";

    #[inline]
    fn _tape(graph: &_Graph) -> &_Tape<Self> {
        &graph.vectors
    }

    #[inline]
    fn _tape_mut(graph: &mut _Graph) -> &mut _Tape<Self> {
        &mut graph.vectors
    }
}

// -----------------------------------------------------------------------------
// _Handle
// -----------------------------------------------------------------------------
/// Public node types wrapping a [Node].
pub(crate) trait _Handle: Sized {
    type Value: _Ranked;

    fn _node(&self) -> &Node<Self::Value>;

    fn _wrap(node: Node<Self::Value>) -> Self;
}

// -----------------------------------------------------------------------------
// Node
// -----------------------------------------------------------------------------
/// Handle to a cell of the tape of rank `V` in a graph.
pub(crate) struct Node<V> {
    graph: Graph,
    index: usize,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Clone for Node<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<V: _Ranked> Debug for Node<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("graph", &self.graph._debug_ptr())
            .field("rank", &V::RANK)
            .field("index", &self.index)
            .field("value", &self._value())
            .finish()
    }
}

//
// ctor
//
impl<V: _Ranked> Node<V> {
    #[inline]
    fn _new(graph: Graph, index: usize) -> Self {
        Self {
            graph,
            index,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn _leaf(graph: &Graph, value: V) -> Self {
        let index = V::_tape_mut(&mut graph.0.borrow_mut())._reg_leaf(value);
        Self::_new(graph.clone(), index)
    }
}

// methods
impl<V: _Ranked> Node<V> {
    #[inline]
    pub(crate) fn _graph(&self) -> &Graph {
        &self.graph
    }

    #[cfg(test)]
    pub(crate) fn _index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn _indirectly_read<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(V::_tape(&self.graph.0.borrow())._value(self.index))
    }

    #[inline]
    pub(crate) fn _value(&self) -> V {
        self._indirectly_read(Clone::clone)
    }

    /// Number of nodes computed directly from this one.
    #[inline]
    pub(crate) fn _fan_out(&self) -> usize {
        V::_tape(&self.graph.0.borrow())._parents(self.index).len()
    }

    #[inline]
    pub(crate) fn _seed(&self, grad: V) {
        log::debug!(
            "seed {} node #{} of graph {:?}",
            V::RANK,
            self.index,
            self.graph._debug_ptr()
        );
        V::_tape_mut(&mut self.graph.0.borrow_mut())._seed(self.index, grad);
    }

    #[inline]
    pub(crate) fn _gradient(&self) -> V {
        V::_tape_mut(&mut self.graph.0.borrow_mut())._gradient(self.index)
    }

    /// Record `f(self)` whose local derivative is given by `f` too.
    #[inline]
    pub(crate) fn _unary(&self, f: impl FnOnce(&V) -> (V, V)) -> Self {
        let index = V::_tape_mut(&mut self.graph.0.borrow_mut())._make_unary(self.index, f);
        Self::_new(self.graph.clone(), index)
    }

    /// Record `f(self, rhs)`.
    ///
    /// # Panics
    /// Panics if `rhs` belongs to another graph or has a different number of elements.
    #[inline]
    pub(crate) fn _binary(
        &self,
        rhs: &Self,
        op: &'static str,
        f: impl FnOnce(&V, &V) -> (V, V, V),
    ) -> Self {
        if !Graph::ptr_eq(&self.graph, &rhs.graph) {
            panic!("Cannot {} nodes from different graphs", op);
        }
        let (lhs_len, rhs_len) = {
            let graph = self.graph.0.borrow();
            let tape = V::_tape(&graph);
            (
                tape._value(self.index).num_elems(),
                tape._value(rhs.index).num_elems(),
            )
        };
        if lhs_len != rhs_len {
            panic!(
                "Cannot {} {} nodes of different lengths (lhs={}, rhs={})",
                op,
                V::RANK,
                lhs_len,
                rhs_len
            );
        }
        let index =
            V::_tape_mut(&mut self.graph.0.borrow_mut())._make_binary(self.index, rhs.index, f);
        Self::_new(self.graph.clone(), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_cell() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, 1.5);

        let y = x.clone();

        assert_eq!(y._index(), x._index());
        assert!(Graph::ptr_eq(y._graph(), x._graph()));
    }

    #[test]
    fn test_fan_out() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, 1.5);
        assert_eq!(x._fan_out(), 0);

        let _ = x._unary(|v| (v * 2.0, 2.0));
        let _ = x._binary(&x, "mul", |l, r| (l * r, *r, *l));

        assert_eq!(x._fan_out(), 3);
    }

    #[test]
    fn test_debug_names_rank() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, Elementwise::from([1.0]));

        let repr = format!("{:?}", x);

        assert!(repr.contains("vector"));
        assert!(repr.contains("index: 0"));
    }

    #[test]
    #[should_panic(expected = "Cannot add nodes from different graphs")]
    fn test_binary_different_graphs() {
        let x = Node::_leaf(&Graph::new(), 1.0);
        let y = Node::_leaf(&Graph::new(), 2.0);

        let _ = x._binary(&y, "add", |l, r| (l + r, 1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_binary_length_mismatch() {
        let graph = Graph::new();
        let x = Node::_leaf(&graph, Elementwise::from([1.0, 2.0]));
        let y = Node::_leaf(&graph, Elementwise::from([1.0]));

        let _ = x._binary(&y, "add", |l, r| (l.clone() + r, l.ones_like(), r.ones_like()));
    }
}
