use serde::{Deserialize, Serialize};

/// Activation functions offered by the tuning search spaces, plus the fixed
/// Softmax output activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    LeakyReLU { alpha: f64 },
    /// ReLU clipped at 6: `min(max(x, 0), 6)`.
    ReLU6,
    Tanh,
    Sigmoid,
    /// Softmax is a vector-valued activation; it is applied at the layer
    /// level (not element-wise) in `Layer::feed_from()`. The element-wise
    /// `function()` method is therefore not used for this variant.
    Softmax,
}

impl ActivationFunction {
    /// Resolves a search-space candidate name to an activation.
    ///
    /// `"leaky_relu"` uses a negative slope of 0.2. Unknown names are a
    /// contract violation: the caller enumerates a fixed candidate set.
    pub fn from_name(name: &str) -> ActivationFunction {
        match name {
            "relu" => ActivationFunction::ReLU,
            "leaky_relu" => ActivationFunction::LeakyReLU { alpha: 0.2 },
            "relu6" => ActivationFunction::ReLU6,
            "tanh" => ActivationFunction::Tanh,
            "sigmoid" => ActivationFunction::Sigmoid,
            other => panic!("unknown activation name '{}'", other),
        }
    }

    /// Element-wise activation. For `Softmax`, call `Layer::feed_from()`
    /// which applies the full-vector softmax; this path must not be reached.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => x.max(0.0),
            ActivationFunction::LeakyReLU { alpha } => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            ActivationFunction::ReLU6 => x.max(0.0).min(6.0),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Softmax => {
                panic!(
                    "ActivationFunction::Softmax::function() must not be called directly; \
                     use Layer::feed_from() which applies the full-vector softmax."
                )
            }
        }
    }

    /// Element-wise derivative of the activation.
    ///
    /// For `Softmax`, the output layer pairs it with cross-entropy and the
    /// combined gradient is `predicted - one_hot(label)` (already computed by
    /// `SparseCrossEntropyLoss::derivative()`). Returning `1.0` here lets
    /// `compute_gradients()` pass that delta through unchanged without
    /// double-applying the Jacobian.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU { alpha } => {
                if x > 0.0 {
                    1.0
                } else {
                    *alpha
                }
            }
            ActivationFunction::ReLU6 => {
                if x > 0.0 && x < 6.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Softmax => 1.0,
        }
    }

    /// True for the ReLU family, which pairs with He weight initialization.
    pub fn is_rectifier(&self) -> bool {
        matches!(
            self,
            ActivationFunction::ReLU
                | ActivationFunction::LeakyReLU { .. }
                | ActivationFunction::ReLU6
        )
    }
}
