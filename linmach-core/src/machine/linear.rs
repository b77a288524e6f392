//! # Linear Machine
//!
//! ```text
//! y = f( ((x - sub) / div) · W + b )
//! ```
//!
//! `W` has shape `[n_inputs, n_outputs]`. `sub` and `div` are per-input,
//! `b` is per-output and `f` is an [`Activation`] applied elementwise.
//!
//! [`LinearMachine::set_weights`] is the only setter that may change the
//! machine's shape. It leaves biases and normalization vectors untouched;
//! until they are re-set (or [`LinearMachine::resize`] is used), `forward`
//! rejects evaluation.

use tracing::{trace, warn};

use super::Machine;
use crate::core::activations::Activation;
use crate::core::matrix::Matrix;
use crate::core::shape::{check_dimensions, check_input_count, check_output_count};
use crate::error::Result;

/// Affine transform with input normalization and output activation
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMachine {
    weights: Matrix,
    biases: Vec<f64>,
    input_sub: Vec<f64>,
    input_div: Vec<f64>,
    activation: Activation,
}

impl LinearMachine {
    /// Zero weights and biases, neutral normalization, identity activation
    pub fn new(n_inputs: usize, n_outputs: usize) -> Result<Self> {
        let weights = Matrix::zeros(n_inputs, n_outputs)?;
        Ok(Self::from_weights(weights))
    }

    /// Machine around an explicit weight matrix; everything else defaults
    pub fn from_weights(weights: Matrix) -> Self {
        let (n_inputs, n_outputs) = weights.shape();
        Self {
            weights,
            biases: vec![0.0; n_outputs],
            input_sub: vec![0.0; n_inputs],
            input_div: vec![1.0; n_inputs],
            activation: Activation::default(),
        }
    }

    /// Assemble a machine from all of its fields, checking every extent
    pub fn from_parts(
        weights: Matrix,
        biases: Vec<f64>,
        input_sub: Vec<f64>,
        input_div: Vec<f64>,
        activation: Activation,
    ) -> Result<Self> {
        let mut machine = Self::from_weights(weights);
        machine.set_biases(&biases)?;
        machine.set_input_subtraction(&input_sub)?;
        machine.set_input_division(&input_div)?;
        machine.set_activation(activation);
        Ok(machine)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub fn input_subtraction(&self) -> &[f64] {
        &self.input_sub
    }

    #[inline]
    pub fn input_division(&self) -> &[f64] {
        &self.input_div
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Number of inputs, taken from the weight matrix
    #[inline]
    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    /// Number of outputs, taken from the weight matrix
    #[inline]
    pub fn output_size(&self) -> usize {
        self.weights.cols()
    }

    /// `(input_size, output_size)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.weights.shape()
    }

    /// True when every vector agrees with the weight shape
    pub fn is_consistent(&self) -> bool {
        self.biases.len() == self.output_size()
            && self.input_sub.len() == self.input_size()
            && self.input_div.len() == self.input_size()
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Replace the weight matrix. May change the machine's shape.
    pub fn set_weights(&mut self, weights: Matrix) {
        if weights.shape() != self.weights.shape() {
            trace!(
                from = ?self.weights.shape(),
                to = ?weights.shape(),
                "weights reshaped, dependent vectors left as-is"
            );
        }
        self.weights = weights;
    }

    pub fn set_biases(&mut self, biases: &[f64]) -> Result<()> {
        check_output_count(self.output_size(), biases.len()).inspect_err(|e| {
            warn!(error = %e, "rejected biases");
        })?;
        self.biases.clear();
        self.biases.extend_from_slice(biases);
        Ok(())
    }

    pub fn set_input_subtraction(&mut self, input_sub: &[f64]) -> Result<()> {
        check_input_count(self.input_size(), input_sub.len()).inspect_err(|e| {
            warn!(error = %e, "rejected input subtraction");
        })?;
        self.input_sub.clear();
        self.input_sub.extend_from_slice(input_sub);
        Ok(())
    }

    /// Entries are divisors; zero entries are not guarded against.
    pub fn set_input_division(&mut self, input_div: &[f64]) -> Result<()> {
        check_input_count(self.input_size(), input_div.len()).inspect_err(|e| {
            warn!(error = %e, "rejected input division");
        })?;
        self.input_div.clear();
        self.input_div.extend_from_slice(input_div);
        Ok(())
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// Reshape every field at once.
    ///
    /// The overlapping part of each array is kept; new weights, biases and
    /// subtraction entries are zero, new division entries are one.
    pub fn resize(&mut self, n_inputs: usize, n_outputs: usize) -> Result<()> {
        check_dimensions(n_inputs, n_outputs)?;
        let weights = self.weights.resized(n_inputs, n_outputs, 0.0)?;
        self.weights = weights;
        self.biases.resize(n_outputs, 0.0);
        self.input_sub.resize(n_inputs, 0.0);
        self.input_div.resize(n_inputs, 1.0);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Evaluate one input row into `output`
    pub fn forward(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        self.check_forward(input.len(), output.len())?;
        trace!(n_inputs = input.len(), n_outputs = output.len(), "forward");
        self.forward_unchecked(input, output);
        Ok(())
    }

    /// Evaluate every row of a `[n_samples, n_inputs]` matrix
    pub fn forward_batch(&self, inputs: &Matrix) -> Result<Matrix> {
        self.check_forward(inputs.cols(), self.output_size())?;
        let mut outputs = Matrix::zeros(inputs.rows(), self.output_size())?;
        for r in 0..inputs.rows() {
            self.forward_unchecked(inputs.row(r), outputs.row_mut(r));
        }
        Ok(outputs)
    }

    fn check_forward(&self, n_input: usize, n_output: usize) -> Result<()> {
        check_input_count(self.input_size(), n_input)?;
        check_output_count(self.output_size(), n_output)?;
        self.check_consistent()
    }

    /// Error form of [`LinearMachine::is_consistent`]
    pub(crate) fn check_consistent(&self) -> Result<()> {
        check_input_count(self.input_size(), self.input_sub.len())?;
        check_input_count(self.input_size(), self.input_div.len())?;
        check_output_count(self.output_size(), self.biases.len())
    }

    /// Normalize, accumulate in ascending input order, add bias, activate.
    fn forward_unchecked(&self, input: &[f64], output: &mut [f64]) {
        output.iter_mut().for_each(|v| *v = 0.0);
        for (i, &x) in input.iter().enumerate() {
            let normalized = (x - self.input_sub[i]) / self.input_div[i];
            for (out, &w) in output.iter_mut().zip(self.weights.row(i)) {
                *out += normalized * w;
            }
        }
        for (out, &b) in output.iter_mut().zip(&self.biases) {
            *out += b;
        }
        self.activation.apply(output);
    }
}

impl Machine for LinearMachine {
    fn input_size(&self) -> usize {
        LinearMachine::input_size(self)
    }

    fn output_size(&self) -> usize {
        LinearMachine::output_size(self)
    }

    fn forward(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        LinearMachine::forward(self, input, output)
    }
}
