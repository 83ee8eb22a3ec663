mod graph_impl;
mod node;
mod rules;
mod tape;

pub(crate) use node::{Node, _Handle};
pub(crate) use rules::Operand;

pub use graph_impl::{Graph, GraphStats};
