use serde::{Deserialize, Serialize};

/// Per-epoch training statistics. `train_loop` returns one of these per
/// completed epoch, oldest first, so callers get the full fit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Fraction of training samples classified correctly, accumulated from
    /// the same forward passes that produced `train_loss`.
    pub train_accuracy: f64,
    /// Mean validation loss, if a validation set was provided.
    pub val_loss: Option<f64>,
    /// Validation accuracy in [0, 1], if a validation set was provided.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
