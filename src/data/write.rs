use std::io;
use std::path::Path;

use crate::data::PIXELS;

/// Writes the two container files downstream consumers read:
///
/// - `build/{name}_labels_uint8` — one fixed-width one-hot record per
///   example, `n_classes` bytes each, no header, no delimiter.
/// - `build/{name}_images.png`   — one grayscale PNG, 784 pixels wide, one
///   row per example, rows in the same order as the label records.
///
/// A label outside `0..n_classes` is an unexpected-label error
/// (`io::ErrorKind::InvalidData`). All records are encoded before any file
/// is created, so that error leaves no output behind.
pub fn write_dataset(images: &[Vec<u8>], labels: &[u8], name: &str, n_classes: usize) -> io::Result<()> {
    write_dataset_to(Path::new("build"), images, labels, name, n_classes)
}

/// `write_dataset` with an explicit output directory.
pub fn write_dataset_to(
    dir: &Path,
    images: &[Vec<u8>],
    labels: &[u8],
    name: &str,
    n_classes: usize,
) -> io::Result<()> {
    assert_eq!(
        images.len(),
        labels.len(),
        "images and labels must have equal length"
    );
    assert!(!images.is_empty(), "cannot write an empty dataset");

    // Encode every record up front; an unexpected label must fail before
    // anything touches the filesystem.
    let mut activations = Vec::with_capacity(labels.len() * n_classes);
    for &label in labels {
        activations.extend(label_to_activation(label, n_classes)?);
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(format!("{}_labels_uint8", name)), &activations)?;

    let flattened: Vec<u8> = images.iter().flat_map(|image| {
        assert_eq!(image.len(), PIXELS, "every image must be {} pixels", PIXELS);
        image.iter().copied()
    }).collect();
    let stacked = image::GrayImage::from_raw(PIXELS as u32, images.len() as u32, flattened)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "pixel buffer size mismatch"))?;
    stacked
        .save(dir.join(format!("{}_images.png", name)))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(())
}

/// One-hot encodes a label as `n_classes` bytes with a single 1 at the
/// label's index.
fn label_to_activation(label: u8, n_classes: usize) -> io::Result<Vec<u8>> {
    let index = label as usize;
    if index >= n_classes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected label {} for a {}-class dataset", label, n_classes),
        ));
    }
    let mut activation = vec![0u8; n_classes];
    activation[index] = 1;
    Ok(activation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "hyperdense_write_{}_{}",
            tag,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn image_filled_with(value: u8) -> Vec<u8> {
        vec![value; PIXELS]
    }

    #[test]
    fn binary_dataset_end_to_end_layout() {
        let dir = scratch_dir("binary");
        let images = vec![image_filled_with(10), image_filled_with(20), image_filled_with(30)];
        let labels = vec![0u8, 1, 0];

        write_dataset_to(&dir, &images, &labels, "zero_one", 2).unwrap();

        // 3 examples × 2 classes = 6 bytes: 01 00 / 00 01 / 01 00.
        let record_bytes = std::fs::read(dir.join("zero_one_labels_uint8")).unwrap();
        assert_eq!(record_bytes, vec![1, 0, 0, 1, 1, 0]);

        // The PNG stacks one 784-pixel row per example, in label order.
        let png = image::open(dir.join("zero_one_images.png")).unwrap().to_luma8();
        assert_eq!(png.width(), PIXELS as u32);
        assert_eq!(png.height(), 3);
        for (row, expected) in [10u8, 20, 30].iter().enumerate() {
            for x in 0..PIXELS as u32 {
                assert_eq!(png.get_pixel(x, row as u32).0[0], *expected);
            }
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn one_hot_records_round_trip_to_the_original_labels() {
        let dir = scratch_dir("roundtrip");
        let labels: Vec<u8> = vec![3, 9, 0, 5, 5, 1];
        let images: Vec<Vec<u8>> = labels.iter().map(|&l| image_filled_with(l)).collect();

        write_dataset_to(&dir, &images, &labels, "digits", 10).unwrap();

        let record_bytes = std::fs::read(dir.join("digits_labels_uint8")).unwrap();
        assert_eq!(record_bytes.len(), labels.len() * 10);
        let decoded: Vec<u8> = record_bytes
            .chunks(10)
            .map(|record| {
                assert_eq!(record.iter().map(|&b| b as usize).sum::<usize>(), 1);
                record.iter().position(|&b| b == 1).unwrap() as u8
            })
            .collect();
        assert_eq!(decoded, labels);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn image_rows_match_label_record_order() {
        let dir = scratch_dir("order");
        let labels: Vec<u8> = vec![2, 7, 4, 1];
        // Mark each image with its label value so rows are distinguishable.
        let images: Vec<Vec<u8>> = labels.iter().map(|&l| image_filled_with(l * 10)).collect();

        write_dataset_to(&dir, &images, &labels, "ordered", 10).unwrap();

        let record_bytes = std::fs::read(dir.join("ordered_labels_uint8")).unwrap();
        let png = image::open(dir.join("ordered_images.png")).unwrap().to_luma8();
        for (n, record) in record_bytes.chunks(10).enumerate() {
            let label = record.iter().position(|&b| b == 1).unwrap() as u8;
            assert_eq!(png.get_pixel(0, n as u32).0[0], label * 10);
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unexpected_label_fails_without_writing_anything() {
        let dir = scratch_dir("unexpected");
        let out = dir.join("out");
        let images = vec![image_filled_with(1), image_filled_with(2)];
        let labels = vec![0u8, 2];

        let err = write_dataset_to(&out, &images, &labels, "zero_one", 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("unexpected label"));
        // Encoding failed before the output directory was even created.
        assert!(!out.exists());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
