// -----------------------------------------------------------------------------
// Error
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Vector nodes must have at least one element")]
    EmptyVector,
    #[error("Component {index} is out of range for a vector of length {len}")]
    ComponentOutOfRange { index: usize, len: usize },
    #[error("Expected {expected} elements but {actual} were given")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Different graphs are used for an operation '{0}'")]
    DifferentGraphs(&'static str),
    #[error("Partial derivatives can only be taken with respect to a variable")]
    NotAVariable,
}
