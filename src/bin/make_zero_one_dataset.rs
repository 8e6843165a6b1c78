//! Prepares the two-class digit container files: MNIST filtered down to the
//! examples labeled 0 or 1, written as `build/zero_one_labels_uint8` and
//! `build/zero_one_images.png` with 2-byte one-hot records.

use hyperdense::{keep_zeros_and_ones, load_mnist, write_dataset};

fn main() {
    let dataset = keep_zeros_and_ones(load_mnist());

    println!("number of images {}", dataset.images.len());
    println!("number of labels {}", dataset.labels.len());

    write_dataset(&dataset.images, &dataset.labels, "zero_one", 2)
        .expect("failed to write zero_one dataset");
}
