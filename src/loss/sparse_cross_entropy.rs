/// Sparse categorical cross-entropy for use with a Softmax output layer.
///
/// "Sparse" meaning the target is an integer class index rather than a
/// one-hot vector, which is how the datasets store their labels.
pub struct SparseCrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl SparseCrossEntropyLoss {
    /// Computes the scalar cross-entropy loss:
    ///   L = -log(predicted[label] + eps)
    ///
    /// `predicted` — softmax probabilities, shape [n_classes]
    /// `label`     — true class index, must be < n_classes
    pub fn loss(predicted: &[f64], label: usize) -> f64 {
        assert!(
            label < predicted.len(),
            "label {} out of range for {} classes",
            label,
            predicted.len()
        );
        -(predicted[label] + EPS).ln()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits:
    ///   ∂L/∂z_i = predicted[i] - [i == label]
    ///
    /// This is the initial delta for the backward pass. The Softmax layer's
    /// own derivative step is identity (1.0) so the combined gradient is not
    /// double-applied.
    pub fn derivative(predicted: &[f64], label: usize) -> Vec<f64> {
        predicted
            .iter()
            .enumerate()
            .map(|(i, &p)| if i == label { p - 1.0 } else { p })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_has_near_zero_loss() {
        let loss = SparseCrossEntropyLoss::loss(&[0.001, 0.998, 0.001], 1);
        assert!(loss < 0.01);
    }

    #[test]
    fn confident_wrong_prediction_has_large_loss() {
        let loss = SparseCrossEntropyLoss::loss(&[0.998, 0.001, 0.001], 1);
        assert!(loss > 5.0);
    }

    #[test]
    fn derivative_is_probabilities_minus_one_hot() {
        let grad = SparseCrossEntropyLoss::derivative(&[0.2, 0.5, 0.3], 1);
        assert!((grad[0] - 0.2).abs() < 1e-12);
        assert!((grad[1] + 0.5).abs() < 1e-12);
        assert!((grad[2] - 0.3).abs() < 1e-12);
        // Gradient over a probability distribution sums to zero.
        assert!(grad.iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn out_of_range_label_is_rejected() {
        SparseCrossEntropyLoss::loss(&[0.5, 0.5], 2);
    }
}
