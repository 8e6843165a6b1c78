//! Prepares the Fashion-MNIST container files for downstream consumers:
//! `build/fashion_labels_uint8` and `build/fashion_images.png`.

use hyperdense::{load_fashion, write_dataset};

fn main() {
    let dataset = load_fashion();

    println!("number of images {}", dataset.images.len());
    println!("number of labels {}", dataset.labels.len());

    write_dataset(&dataset.images, &dataset.labels, "fashion", 10)
        .expect("failed to write fashion dataset");
}
