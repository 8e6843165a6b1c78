use crate::{activation::activation::ActivationFunction, layers::dense::Layer};
use serde::{Deserialize, Serialize};

/// A feed-forward stack of dense layers. Images arrive pre-flattened, so the
/// first layer's `input_size` is the pixel count.
#[derive(Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs
            .into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers }
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: Vec<f64>) -> Vec<f64> {
        let mut current = input;
        for layer in &mut self.layers {
            current = layer.feed_from(current);
        }
        current
    }

    /// Prints a one-line-per-layer architecture description, with parameter
    /// counts, after the tuner has picked a configuration.
    pub fn summary(&self) {
        println!("Model:");
        let mut total = 0usize;
        for (i, layer) in self.layers.iter().enumerate() {
            let params = layer.weights.rows * layer.weights.cols + layer.size;
            total += params;
            println!(
                "  layer {}: dense {} -> {}  {:?}  ({} params)",
                i, layer.weights.rows, layer.size, layer.activator, params
            );
        }
        println!("  total params: {}", total);
    }

    /// Serializes the network architecture and weights to a pretty-printed
    /// JSON file. This is the trained model artifact the tuning binaries
    /// leave behind.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer() -> Network {
        Network::new(vec![
            (4, 3, ActivationFunction::Tanh),
            (2, 4, ActivationFunction::Softmax),
        ])
    }

    #[test]
    fn forward_produces_one_score_per_class() {
        let mut net = two_layer();
        let out = net.forward(vec![0.0, 0.5, 1.0]);
        assert_eq!(out.len(), 2);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn save_and_load_round_trip_preserves_outputs() {
        let dir = std::env::temp_dir().join(format!(
            "hyperdense_net_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("model.json");
        let path = path.to_str().unwrap();

        let mut net = two_layer();
        let input = vec![0.25, -0.5, 0.75];
        let before = net.forward(input.clone());

        net.save_json(path).unwrap();
        let mut loaded = Network::load_json(path).unwrap();
        let after = loaded.forward(input);

        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        std::fs::remove_dir_all(dir).unwrap();
    }
}
