use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};
use serde::{Deserialize, Serialize};

/// A fully-connected layer: `a = activation(x * W + b)`.
///
/// Weights are stored input×output so a 1×input row vector multiplies
/// directly. The forward pass caches both the pre-activation values and the
/// activations, which the backward pass needs.
#[derive(Debug, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub neurons: Matrix,
    pre_neurons: Matrix, // pre-activation values (z = xW + b) needed for correct derivative
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
}

impl Layer {
    /// Creates a layer with He-initialized weights for ReLU-family
    /// activations and Xavier-initialized weights otherwise. Biases start at
    /// zero.
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        let weights = if activation.is_rectifier() {
            Matrix::he(input_size, size)
        } else {
            Matrix::xavier(input_size, size)
        };

        Layer {
            size,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
        }
    }

    pub fn feed_from(&mut self, input: Vec<f64>) -> Vec<f64> {
        let z = Matrix::from_data(vec![input]) * self.weights.clone() + self.biases.clone();
        let a = match self.activator {
            ActivationFunction::Softmax => softmax_row(&z),
            _ => z.map(|x| self.activator.function(x)),
        };
        self.pre_neurons = z;
        self.neurons = a.clone();
        a.data[0].clone()
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    /// `next_layer_delta` is ∂L/∂a for this layer (error in activation space).
    pub fn compute_gradients(&self, next_layer_delta: Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        // Use pre-activation z so that derivative(z) is evaluated correctly.
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // Element-wise (Hadamard) product: δ = error ⊙ f'(z)
        let layer_delta = hadamard(&next_layer_delta, &act_derivative);

        let weights_adjustment = inputs.transpose() * layer_delta.clone();
        let biases_adjustment = layer_delta;

        (weights_adjustment, biases_adjustment)
    }

    /// Subtracts pre-scaled update matrices from the parameters. The
    /// optimizer owns the step-size math; this only applies it.
    pub fn apply_update(&mut self, weights_delta: Matrix, biases_delta: Matrix) {
        self.weights = self.weights.clone() - weights_delta;
        self.biases = self.biases.clone() - biases_delta;
    }
}

/// Numerically stable softmax over a 1×n matrix.
fn softmax_row(z: &Matrix) -> Matrix {
    let row = &z.data[0];
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    Matrix::from_data(vec![exps.into_iter().map(|e| e / sum).collect()])
}

/// Element-wise (Hadamard) product of two same-shape matrices.
fn hadamard(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.cols, b.cols);
    let data = a
        .data
        .iter()
        .zip(b.data.iter())
        .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
        .collect();
    Matrix::from_data(data)
}
