use std::time::Instant;

use rand::seq::SliceRandom;

use crate::loss::sparse_cross_entropy::SparseCrossEntropyLoss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::adam::Adam;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of shuffled mini-batch Adam
/// and returns the per-epoch stats history, oldest first.
///
/// # Arguments
/// - `network`    — mutable reference to the network; modified in place
/// - `inputs`     — training samples, each a `Vec<f64>` of length `input_size`
/// - `labels`     — class indices, same length as `inputs`
/// - `validation` — optional (inputs, labels) pair scored after each epoch
/// - `optimizer`  — Adam optimizer created for this network
/// - `config`     — epoch count, batch size, verbosity
///
/// # Panics
/// Panics if `inputs` is empty, lengths mismatch, or `batch_size == 0`.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[u8],
    validation: Option<(&[Vec<f64>], &[u8])>,
    optimizer: &mut Adam,
    config: &TrainConfig,
) -> Vec<EpochStats> {
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(
        inputs.len(),
        labels.len(),
        "inputs and labels must have equal length"
    );
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let (train_loss, train_accuracy) =
            run_one_epoch(network, inputs, labels, optimizer, config.batch_size);

        let (val_loss, val_accuracy) = match validation {
            Some((vi, vl)) => {
                let (loss, acc) = evaluate(network, vi, vl);
                (Some(loss), Some(acc))
            }
            None => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.verbose {
            print_epoch_line(&stats);
        }

        history.push(stats);
    }

    history
}

/// Mean loss and accuracy over a dataset without any weight updates.
/// Panics if the slices are empty or of different lengths.
pub fn evaluate(network: &mut Network, inputs: &[Vec<f64>], labels: &[u8]) -> (f64, f64) {
    assert!(!inputs.is_empty(), "cannot evaluate on an empty dataset");
    assert_eq!(
        inputs.len(),
        labels.len(),
        "inputs and labels must have equal length"
    );

    let n = inputs.len();
    let mut total_loss = 0.0;
    let mut correct = 0usize;

    for (input, &label) in inputs.iter().zip(labels.iter()) {
        let output = network.forward(input.clone());
        total_loss += SparseCrossEntropyLoss::loss(&output, label as usize);
        if argmax(&output) == label as usize {
            correct += 1;
        }
    }

    (total_loss / n as f64, correct as f64 / n as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of shuffled mini-batch training.
/// Returns (mean loss, accuracy) accumulated from the training forward passes.
fn run_one_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[u8],
    optimizer: &mut Adam,
    batch_size: usize,
) -> (f64, f64) {
    let n = inputs.len();
    let mut total_loss = 0.0;
    let mut correct = 0usize;

    // Shuffle sample order each epoch.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rand::thread_rng());

    for batch_start in (0..n).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(n);
        let actual_batch_size = (batch_end - batch_start) as f64;

        // Zero-initialize accumulated gradient storage, one pair per layer.
        let mut acc_grads: Vec<(Matrix, Matrix)> = network
            .layers
            .iter()
            .map(|layer| {
                (
                    Matrix::zeros(layer.weights.rows, layer.weights.cols),
                    Matrix::zeros(layer.biases.rows, layer.biases.cols),
                )
            })
            .collect();

        // Accumulate gradients over the mini-batch.
        for &idx in &indices[batch_start..batch_end] {
            let input = &inputs[idx];
            let label = labels[idx] as usize;

            let output = network.forward(input.clone());

            total_loss += SparseCrossEntropyLoss::loss(&output, label);
            if argmax(&output) == label {
                correct += 1;
            }

            // Initial delta: combined Softmax + CE gradient, p - one_hot.
            let error = SparseCrossEntropyLoss::derivative(&output, label);
            let mut delta = Matrix::from_data(vec![error]);

            // Backward pass, output layer first.
            for i in (0..network.layers.len()).rev() {
                let input_for_layer = if i == 0 {
                    Matrix::from_data(vec![input.clone()])
                } else {
                    network.layers[i - 1].neurons.clone()
                };

                let (w_grad, b_grad) =
                    network.layers[i].compute_gradients(delta.clone(), &input_for_layer);

                if i > 0 {
                    // Propagate δ through the weights to get ∂L/∂a_{i-1}.
                    delta = b_grad.clone() * network.layers[i].weights.transpose();
                }

                acc_grads[i].0 = acc_grads[i].0.clone() + w_grad;
                acc_grads[i].1 = acc_grads[i].1.clone() + b_grad;
            }
        }

        // Average the accumulated gradients and apply one Adam step per layer.
        let inv_batch = 1.0 / actual_batch_size;
        for (i, (w_acc, b_acc)) in acc_grads.into_iter().enumerate() {
            let w_avg = w_acc.map(|x| x * inv_batch);
            let b_avg = b_acc.map(|x| x * inv_batch);
            optimizer.step(i, &mut network.layers[i], w_avg, b_avg);
        }
    }

    (total_loss / n as f64, correct as f64 / n as f64)
}

fn print_epoch_line(stats: &EpochStats) {
    match (stats.val_loss, stats.val_accuracy) {
        (Some(vl), Some(va)) => println!(
            "epoch {:>3}/{} - loss: {:.4} - accuracy: {:.4} - val_loss: {:.4} - val_accuracy: {:.4} ({} ms)",
            stats.epoch,
            stats.total_epochs,
            stats.train_loss,
            stats.train_accuracy,
            vl,
            va,
            stats.elapsed_ms
        ),
        _ => println!(
            "epoch {:>3}/{} - loss: {:.4} - accuracy: {:.4} ({} ms)",
            stats.epoch, stats.total_epochs, stats.train_loss, stats.train_accuracy, stats.elapsed_ms
        ),
    }
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;

    /// A linearly separable toy problem: class is whichever input is larger.
    fn toy_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let inputs = vec![
            vec![0.9, 0.1],
            vec![0.8, 0.3],
            vec![0.7, 0.0],
            vec![0.6, 0.2],
            vec![0.1, 0.9],
            vec![0.3, 0.8],
            vec![0.0, 0.7],
            vec![0.2, 0.6],
        ];
        let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (inputs, labels)
    }

    fn toy_network() -> Network {
        Network::new(vec![
            (8, 2, ActivationFunction::ReLU),
            (2, 8, ActivationFunction::Softmax),
        ])
    }

    #[test]
    fn training_reduces_loss_on_a_separable_problem() {
        let (inputs, labels) = toy_data();
        let mut net = toy_network();
        let mut opt = Adam::with_learning_rate(&net, 0.01);

        let (initial_loss, _) = evaluate(&mut net, &inputs, &labels);
        let history = train_loop(
            &mut net,
            &inputs,
            &labels,
            None,
            &mut opt,
            &TrainConfig::new(200, 4),
        );
        let (final_loss, final_acc) = evaluate(&mut net, &inputs, &labels);

        assert_eq!(history.len(), 200);
        assert!(final_loss < initial_loss);
        assert!(final_acc > 0.9);
    }

    #[test]
    fn history_carries_validation_stats_when_requested() {
        let (inputs, labels) = toy_data();
        let mut net = toy_network();
        let mut opt = Adam::new(&net);

        let history = train_loop(
            &mut net,
            &inputs[..6],
            &labels[..6],
            Some((&inputs[6..], &labels[6..])),
            &mut opt,
            &TrainConfig::new(3, 2),
        );

        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|s| s.val_loss.is_some()));
        assert!(history.iter().all(|s| s.val_accuracy.is_some()));
        assert_eq!(history[0].epoch, 1);
        assert_eq!(history[2].epoch, 3);
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_are_rejected() {
        let (inputs, labels) = toy_data();
        let mut net = toy_network();
        let mut opt = Adam::new(&net);
        train_loop(
            &mut net,
            &inputs,
            &labels[..4],
            None,
            &mut opt,
            &TrainConfig::new(1, 2),
        );
    }

    #[test]
    fn evaluate_is_deterministic() {
        // The forward pass has no randomness, so repeated evaluations of the
        // same network score identically.
        let (inputs, labels) = toy_data();
        let mut net = toy_network();
        let first = evaluate(&mut net, &inputs, &labels);
        let second = evaluate(&mut net, &inputs, &labels);
        assert_eq!(first, second);
    }
}
