pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod tune;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use loss::sparse_cross_entropy::SparseCrossEntropyLoss;
pub use optim::adam::Adam;
pub use train::{evaluate, train_loop, EpochStats, TrainConfig};
pub use data::{keep_zeros_and_ones, load_fashion, load_mnist, write_dataset, Dataset};
pub use data::{IMAGE_SIZE, PIXELS};
pub use tune::{Hyperband, HyperbandConfig, HyperparameterSample, SearchSpace};
