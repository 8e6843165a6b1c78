pub mod hyperband;
pub mod space;

pub use hyperband::{Hyperband, HyperbandConfig, SearchOutcome, TrialRecord};
pub use space::{HpValue, HyperparameterSample, SearchSpace};
