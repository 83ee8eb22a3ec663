//! Reverse mode automatic differentiation over scalar and element-wise values.
//!
//! Nodes are created from a [Graph] and combined with arithmetic operators
//! or the functions in [op]. Gradients are read after seeding an objective
//! with [ScalarNode::backward], [VectorNode::backward] or the `partial` shortcuts.
//!
//! ```
//! use dautodiff::{op, Graph};
//!
//! let graph = Graph::new();
//! let x = graph.scalar(0.5);
//! let y = graph.scalar(4.0);
//!
//! let z = op::exp(&x) * &y - op::log(&y, 2.0);
//! z.backward();
//!
//! assert_eq!(x.gradient(), 0.5f64.exp() * 4.0);
//! ```
mod arith;
mod error;
pub mod forward;
mod graph;
pub mod op;
mod scalar;
mod vector;

pub use error::Error;
pub use graph::{Graph, GraphStats};
pub use scalar::ScalarNode;
pub use vector::VectorNode;

pub use dmath::num::{Elementwise, Pow};
