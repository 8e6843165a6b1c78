pub mod load;
pub mod write;

pub use load::{keep_zeros_and_ones, load_fashion, load_mnist, Dataset};
pub use write::{write_dataset, write_dataset_to};

/// Side length of every image in the supported datasets.
pub const IMAGE_SIZE: usize = 28;
/// Flattened pixel count per image.
pub const PIXELS: usize = IMAGE_SIZE * IMAGE_SIZE;
