use crate::{layers::dense::Layer, math::matrix::Matrix, network::network::Network};

/// Adam optimizer with per-layer first/second moment estimates and bias
/// correction. One `Adam` instance is tied to the network it was created
/// for; its moment buffers mirror that network's parameter shapes.
pub struct Adam {
    pub learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    moments: Vec<LayerMoments>,
}

struct LayerMoments {
    m_weights: Matrix,
    v_weights: Matrix,
    m_biases: Matrix,
    v_biases: Matrix,
    /// Timestep for bias correction; each layer steps once per mini-batch.
    t: i32,
}

impl Adam {
    /// Creates an optimizer with the stock defaults: lr 0.001,
    /// betas (0.9, 0.999), epsilon 1e-7.
    pub fn new(network: &Network) -> Adam {
        Adam::with_learning_rate(network, 0.001)
    }

    pub fn with_learning_rate(network: &Network, learning_rate: f64) -> Adam {
        let moments = network
            .layers
            .iter()
            .map(|layer| LayerMoments {
                m_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
                v_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
                m_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
                v_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
                t: 0,
            })
            .collect();

        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            moments,
        }
    }

    /// Applies one Adam update to `layer` given its averaged mini-batch
    /// gradients. `layer_index` selects the matching moment buffers.
    pub fn step(
        &mut self,
        layer_index: usize,
        layer: &mut Layer,
        weights_grad: Matrix,
        biases_grad: Matrix,
    ) {
        let moments = &mut self.moments[layer_index];
        moments.t += 1;

        let w_update = adam_update(
            &mut moments.m_weights,
            &mut moments.v_weights,
            &weights_grad,
            moments.t,
            self.learning_rate,
            self.beta1,
            self.beta2,
            self.epsilon,
        );
        let b_update = adam_update(
            &mut moments.m_biases,
            &mut moments.v_biases,
            &biases_grad,
            moments.t,
            self.learning_rate,
            self.beta1,
            self.beta2,
            self.epsilon,
        );

        layer.apply_update(w_update, b_update);
    }
}

/// Updates the moment estimates in place and returns the pre-scaled
/// parameter delta: lr * m_hat / (sqrt(v_hat) + eps).
#[allow(clippy::too_many_arguments)]
fn adam_update(
    m: &mut Matrix,
    v: &mut Matrix,
    grad: &Matrix,
    t: i32,
    lr: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
) -> Matrix {
    assert_eq!(m.rows, grad.rows);
    assert_eq!(m.cols, grad.cols);

    let m_correction = 1.0 - beta1.powi(t);
    let v_correction = 1.0 - beta2.powi(t);

    let mut update = Matrix::zeros(grad.rows, grad.cols);
    for i in 0..grad.rows {
        for j in 0..grad.cols {
            let g = grad.data[i][j];
            m.data[i][j] = beta1 * m.data[i][j] + (1.0 - beta1) * g;
            v.data[i][j] = beta2 * v.data[i][j] + (1.0 - beta2) * g * g;
            let m_hat = m.data[i][j] / m_correction;
            let v_hat = v.data[i][j] / v_correction;
            update.data[i][j] = lr * m_hat / (v_hat.sqrt() + epsilon);
        }
    }
    update
}
