use dmath::num::Numeric;

// -----------------------------------------------------------------------------
// _Cell
// -----------------------------------------------------------------------------
/// A node stored on a tape.
///
/// `parents` lists the nodes computed from this one, paired with the local
/// derivative of that parent with respect to this node.
/// A pair is appended each time this node is used as an operand.
#[derive(Debug)]
struct _Cell<V> {
    value: V,
    parents: Vec<(usize, V)>,
}

// -----------------------------------------------------------------------------
// _Tape
// -----------------------------------------------------------------------------
/// Design note:
///
/// Cells are only ever appended and never removed while the tape lives.
/// An operation registers its result after reading its operands,
/// so every parent of a cell has a strictly larger index than the cell itself.
/// This makes the graph acyclic by construction and guarantees that
/// the traversal in [_Tape::_gradient] terminates.
///
/// Gradients are memoized in `grads_memo`, which is indexed like `cells`.
/// `reached` marks the memoized cells with a path to the seed. Only those
/// contribute to their operands, so that `0 * inf` from an unrelated use
/// never turns a gradient into NaN.
/// The memo is reset lazily: seeding or recording a new edge only marks it stale,
/// and the next query rebuilds it from the seed.
/// Registering a leaf adds no edge, so cached gradients stay valid.
#[derive(Debug)]
pub(crate) struct _Tape<V> {
    cells: Vec<_Cell<V>>,
    seed: Option<(usize, V)>,
    grads_memo: Vec<Option<V>>,
    reached: Vec<bool>,
    stale: bool,
    next_nodes: Vec<(usize, bool)>,
    accumulations: usize,
}

impl<V> Default for _Tape<V> {
    #[inline]
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            seed: None,
            grads_memo: Vec::new(),
            reached: Vec::new(),
            stale: false,
            next_nodes: Vec::new(),
            accumulations: 0,
        }
    }
}

impl<V> _Tape<V> {
    #[inline]
    pub(crate) fn _len(&self) -> usize {
        self.cells.len()
    }

    /// Number of gradients computed so far, cache hits excluded.
    #[inline]
    pub(crate) fn _accumulations(&self) -> usize {
        self.accumulations
    }

    #[inline]
    fn _cell(&self, idx: usize) -> &_Cell<V> {
        self.cells.get(idx).expect("Tape must manage this node")
    }

    #[inline]
    pub(crate) fn _value(&self, idx: usize) -> &V {
        &self._cell(idx).value
    }

    #[inline]
    pub(crate) fn _parents(&self, idx: usize) -> &[(usize, V)] {
        &self._cell(idx).parents
    }

    #[inline]
    pub(crate) fn _reg_leaf(&mut self, value: V) -> usize {
        self.cells.push(_Cell {
            value,
            parents: Vec::new(),
        });
        self.cells.len() - 1
    }

    #[inline]
    fn _push_parent(&mut self, child: usize, parent: usize, der: V) {
        self.cells
            .get_mut(child)
            .expect("Tape must manage this node")
            .parents
            .push((parent, der));
        self.stale = true;
    }

    /// Register the result of a unary operation.
    ///
    /// `f` receives the operand value and returns the result value
    /// with its local derivative.
    #[inline]
    pub(crate) fn _make_unary<F>(&mut self, arg: usize, f: F) -> usize
    where
        F: FnOnce(&V) -> (V, V),
    {
        let (value, der) = f(self._value(arg));
        let index = self._reg_leaf(value);
        self._push_parent(arg, index, der);
        index
    }

    /// Register the result of a binary operation.
    ///
    /// `f` receives both operand values and returns the result value with
    /// its local derivatives to `lhs` and `rhs`.
    /// `lhs` and `rhs` may be the same node, which then records two parent pairs.
    #[inline]
    pub(crate) fn _make_binary<F>(&mut self, lhs: usize, rhs: usize, f: F) -> usize
    where
        F: FnOnce(&V, &V) -> (V, V, V),
    {
        let (value, lder, rder) = f(self._value(lhs), self._value(rhs));
        let index = self._reg_leaf(value);
        self._push_parent(lhs, index, lder);
        self._push_parent(rhs, index, rder);
        index
    }

    /// Make `idx` the objective of the following gradient queries.
    ///
    /// A tape has at most one seed. Seeding replaces the previous one.
    #[inline]
    pub(crate) fn _seed(&mut self, idx: usize, grad: V) {
        debug_assert!(idx < self.cells.len());
        self.seed = Some((idx, grad));
        self.stale = true;
    }

    fn _refresh_memo(&mut self)
    where
        V: Clone,
    {
        if self.stale {
            self.grads_memo.clear();
            self.grads_memo.resize_with(self.cells.len(), || None);
            self.reached.clear();
            self.reached.resize(self.cells.len(), false);
            if let Some((idx, grad)) = &self.seed {
                self.grads_memo[*idx] = Some(grad.clone());
                self.reached[*idx] = true;
            }
            self.stale = false;
        } else if self.grads_memo.len() < self.cells.len() {
            self.grads_memo.resize_with(self.cells.len(), || None);
            self.reached.resize(self.cells.len(), false);
        }
    }

    /// Gradient of the seeded node with respect to `idx`.
    ///
    /// Evaluates
    /// ```text
    /// grad(n) = sum of grad(parent) * local_derivative over (parent, local_derivative) in n.parents
    /// ```
    /// in post order with an explicit stack so that long chains do not
    /// overflow the call stack. Each gradient is computed at most once
    /// until the memo becomes stale.
    ///
    /// The sum only runs over parents reached from the seed.
    /// Without a seed every gradient is zero.
    pub(crate) fn _gradient(&mut self, idx: usize) -> V
    where
        V: Numeric,
    {
        self._refresh_memo();

        let Self {
            cells,
            grads_memo,
            reached,
            next_nodes: stack,
            accumulations,
            ..
        } = self;
        let before = *accumulations;

        stack.clear();
        stack.push((idx, false));
        while let Some((tgt, expanded)) = stack.pop() {
            if grads_memo[tgt].is_some() {
                continue;
            }
            let cell = &cells[tgt];
            if !expanded {
                // parents are created after `tgt`, so none of them is waiting
                // on the stack for `tgt` to finish.
                stack.push((tgt, true));
                stack.extend(
                    cell.parents
                        .iter()
                        .filter(|(parent, _)| grads_memo[*parent].is_none())
                        .map(|(parent, _)| (*parent, false)),
                );
                continue;
            }

            let mut total = cell.value.zeros_like();
            for (parent, der) in &cell.parents {
                if !reached[*parent] {
                    continue;
                }
                let grad = grads_memo[*parent]
                    .as_ref()
                    .expect("Parents are evaluated before their operands");
                total += &(grad.clone() * der);
                reached[tgt] = true;
            }
            grads_memo[tgt] = Some(total);
            *accumulations += 1;
        }
        log::trace!(
            "accumulated {} gradients to reach node #{}",
            *accumulations - before,
            idx
        );

        grads_memo[idx]
            .clone()
            .expect("Gradient must be evaluated at the end of traversal")
    }
}
