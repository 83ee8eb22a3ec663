//! Numeric abstractions shared by scalar and element-wise computations.
pub mod num;
