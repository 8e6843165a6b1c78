use mnist::{Mnist, MnistBuilder};

use crate::data::PIXELS;

/// A labeled image collection. `images[i]` is a flat 784-byte 28×28 grid
/// paired with `labels[i]`; the two containers always have equal length.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub images: Vec<Vec<u8>>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn new(images: Vec<Vec<u8>>, labels: Vec<u8>) -> Dataset {
        assert_eq!(
            images.len(),
            labels.len(),
            "images and labels must have equal length"
        );
        Dataset { images, labels }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pixel intensities divided by 255, so 0 maps to 0.0 and 255 to 1.0.
    /// Every model sees this representation, never the raw bytes.
    pub fn normalized_images(&self) -> Vec<Vec<f64>> {
        self.images
            .iter()
            .map(|image| image.iter().map(|&p| p as f64 / 255.0).collect())
            .collect()
    }
}

/// Fetches the MNIST digit dataset (downloading and extracting under
/// `build/mnist` on first use) and concatenates the canonical 60k train and
/// 10k test partitions, train first. Any fetch or parse failure aborts.
pub fn load_mnist() -> Dataset {
    let mnist = MnistBuilder::new()
        .base_path("build/mnist")
        .label_format_digit()
        .training_set_length(60_000)
        .test_set_length(10_000)
        .download_and_extract()
        .finalize();
    concat_partitions(mnist)
}

/// Fetches the Fashion-MNIST dataset (under `build/fashion`) and
/// concatenates its canonical partitions the same way as `load_mnist`.
pub fn load_fashion() -> Dataset {
    let mnist = MnistBuilder::new()
        .base_path("build/fashion")
        .label_format_digit()
        .training_set_length(60_000)
        .test_set_length(10_000)
        .use_fashion_data()
        .download_and_extract()
        .finalize();
    concat_partitions(mnist)
}

fn concat_partitions(raw: Mnist) -> Dataset {
    let Mnist {
        trn_img,
        trn_lbl,
        tst_img,
        tst_lbl,
        ..
    } = raw;

    let mut images: Vec<Vec<u8>> = trn_img.chunks(PIXELS).map(<[u8]>::to_vec).collect();
    images.extend(tst_img.chunks(PIXELS).map(<[u8]>::to_vec));

    let mut labels = trn_lbl;
    labels.extend(tst_lbl);

    Dataset::new(images, labels)
}

/// Retains only the examples labeled 0 or 1, preserving relative order and
/// image/label pairing. Applying it twice yields the same result as once.
pub fn keep_zeros_and_ones(dataset: Dataset) -> Dataset {
    let (images, labels) = dataset
        .images
        .into_iter()
        .zip(dataset.labels)
        .filter(|&(_, label)| label <= 1)
        .unzip();
    Dataset { images, labels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(labels: &[u8]) -> Dataset {
        let images = labels
            .iter()
            .enumerate()
            .map(|(i, _)| vec![i as u8; PIXELS])
            .collect();
        Dataset::new(images, labels.to_vec())
    }

    #[test]
    fn lengths_stay_paired_after_filtering() {
        let filtered = keep_zeros_and_ones(synthetic(&[0, 7, 1, 2, 1, 9, 0]));
        assert_eq!(filtered.images.len(), filtered.labels.len());
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn filtering_keeps_only_zeros_and_ones_in_order() {
        let filtered = keep_zeros_and_ones(synthetic(&[3, 0, 1, 5, 1]));
        assert_eq!(filtered.labels, vec![0, 1, 1]);
        assert!(filtered.labels.iter().all(|&l| l <= 1));
        // Image pairing survives: example 0 came from position 1.
        assert_eq!(filtered.images[0], vec![1u8; PIXELS]);
        assert_eq!(filtered.images[1], vec![2u8; PIXELS]);
        assert_eq!(filtered.images[2], vec![4u8; PIXELS]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = keep_zeros_and_ones(synthetic(&[0, 7, 1, 2, 1, 9, 0]));
        let twice = keep_zeros_and_ones(once.clone());
        assert_eq!(once.labels, twice.labels);
        assert_eq!(once.images, twice.images);
    }

    #[test]
    fn normalization_maps_byte_extremes_to_unit_interval() {
        let mut dataset = synthetic(&[0]);
        dataset.images[0][0] = 0;
        dataset.images[0][1] = 255;
        dataset.images[0][2] = 51;

        let normalized = dataset.normalized_images();
        assert_eq!(normalized[0][0], 0.0);
        assert_eq!(normalized[0][1], 1.0);
        assert!((normalized[0][2] - 0.2).abs() < 1e-12);
        assert!(normalized[0].iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    #[should_panic]
    fn unpaired_containers_are_rejected() {
        Dataset::new(vec![vec![0; PIXELS]], vec![0, 1]);
    }
}
