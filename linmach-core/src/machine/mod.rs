//! # Machines
//!
//! Deterministic inference units mapping a fixed-size input vector to a
//! fixed-size output vector.

pub mod linear;

pub use linear::LinearMachine;

use crate::error::Result;

/// Machine trait
///
/// `forward` writes into a caller-provided buffer so hot loops do not
/// allocate per call.
pub trait Machine: Send + Sync {
    fn input_size(&self) -> usize;
    fn output_size(&self) -> usize;
    fn forward(&self, input: &[f64], output: &mut [f64]) -> Result<()>;

    /// Allocating convenience around [`Machine::forward`]
    fn forward_vec(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut output = vec![0.0; self.output_size()];
        self.forward(input, &mut output)?;
        Ok(output)
    }
}
