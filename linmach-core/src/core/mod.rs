//! # Core Primitives
//!
//! Building blocks shared by every machine:
//! - Activation functions
//! - Dense matrix storage
//! - Shape validation

pub mod activations;
pub mod matrix;
pub mod shape;

pub use activations::{Activation, UnknownActivation};
pub use matrix::Matrix;
pub use shape::{check_dimensions, check_input_count, check_output_count, element_count};

/// Prelude module for core exports
pub mod prelude {
    pub use crate::core::activations::{Activation, UnknownActivation};
    pub use crate::core::matrix::Matrix;
}
