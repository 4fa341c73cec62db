use rand::Rng;
use tracing::debug;

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::error::{Error, Result};
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;

/// Standard deviation of the initial weight distribution.
pub const INIT_STD: f64 = 0.01;

/// Two-layer perceptron: `input → sigmoid(hidden) → sigmoid(output)`.
///
/// Shapes are fixed at construction:
/// - `w1`: input × hidden, `b1`: 1 × hidden
/// - `w2`: hidden × output, `b2`: 1 × output
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

/// Intermediate values of one forward pass, consumed by the matching
/// `backward` call.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub z1: Matrix,
    pub a1: Matrix,
    pub z2: Matrix,
    pub a2: Matrix,
}

impl ForwardPass {
    /// The network output `a2`, one row per sample.
    pub fn output(&self) -> &Matrix {
        &self.a2
    }
}

/// Batch-averaged gradients for every parameter, same shapes as the parameters.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub dw1: Matrix,
    pub db1: Matrix,
    pub dw2: Matrix,
    pub db2: Matrix,
}

impl Mlp {
    /// Builds a network with N(0, 0.01²) weights and zero biases, drawing
    /// from the thread-local RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<Mlp> {
        Mlp::with_rng(input_size, hidden_size, output_size, &mut rand::thread_rng())
    }

    /// Same as [`Mlp::new`] with a caller-supplied RNG, for reproducible runs.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Mlp> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(Error::InvalidDimensions(format!(
                "layer sizes must be positive, got {input_size}-{hidden_size}-{output_size}"
            )));
        }

        debug!(input_size, hidden_size, output_size, "initialising mlp");

        Ok(Mlp {
            w1: Matrix::random_normal(input_size, hidden_size, INIT_STD, rng),
            b1: Matrix::zeros(1, hidden_size),
            w2: Matrix::random_normal(hidden_size, output_size, INIT_STD, rng),
            b2: Matrix::zeros(1, output_size),
        })
    }

    pub fn input_size(&self) -> usize {
        self.w1.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.cols
    }

    pub fn output_size(&self) -> usize {
        self.w2.cols
    }

    /// Forward pass over a batch `x` (samples × features).
    pub fn forward(&self, x: &Matrix) -> Result<ForwardPass> {
        let z1 = x.dot(&self.w1)?.add_row(&self.b1)?;
        let a1 = z1.map(sigmoid);
        let z2 = a1.dot(&self.w2)?.add_row(&self.b2)?;
        let a2 = z2.map(sigmoid);
        Ok(ForwardPass { z1, a1, z2, a2 })
    }

    /// Network output only; the cache is dropped.
    pub fn predict(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward(x)?.a2)
    }

    /// Gradients of the binary cross-entropy w.r.t. every parameter for the
    /// batch `x` with labels `y`, using the cache from `forward(x)`.
    pub fn compute_gradients(&self, x: &Matrix, y: &Matrix, pass: &ForwardPass) -> Result<Gradients> {
        let m = x.rows as f64;

        // Sigmoid output paired with BCE: dL/dz2 = a2 - y.
        let dz2 = BceLoss::derivative(&pass.a2, y)?;
        let dw2 = pass.a1.transpose().dot(&dz2)?.scale(1.0 / m);
        let db2 = dz2.mean_rows();

        // Use pre-activation z1 so that σ'(z1) is computed correctly.
        let dz1 = dz2
            .dot(&self.w2.transpose())?
            .hadamard(&pass.z1.map(sigmoid_derivative))?;
        let dw1 = x.transpose().dot(&dz1)?.scale(1.0 / m);
        let db1 = dz1.mean_rows();

        Ok(Gradients { dw1, db1, dw2, db2 })
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &Gradients, lr: f64) -> Result<()> {
        self.w1.sub_scaled_assign(&grads.dw1, lr)?;
        self.b1.sub_scaled_assign(&grads.db1, lr)?;
        self.w2.sub_scaled_assign(&grads.dw2, lr)?;
        self.b2.sub_scaled_assign(&grads.db2, lr)?;
        Ok(())
    }

    /// Computes gradients for the batch and takes one plain gradient-descent
    /// step. Returns the gradients that were applied.
    pub fn backward(&mut self, x: &Matrix, y: &Matrix, pass: &ForwardPass, lr: f64) -> Result<Gradients> {
        let grads = self.compute_gradients(x, y, pass)?;
        self.apply_gradients(&grads, lr)?;
        Ok(grads)
    }
}
