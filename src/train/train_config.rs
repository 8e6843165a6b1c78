/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`     — total number of full passes over the training data
/// - `batch_size` — samples per mini-batch; use `1` for online updates
/// - `verbose`    — print one stats line per completed epoch
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub verbose: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            verbose: false,
        }
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}
