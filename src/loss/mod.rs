pub mod sparse_cross_entropy;

pub use sparse_cross_entropy::SparseCrossEntropyLoss;
