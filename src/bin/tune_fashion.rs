//! Hyperband search plus final training for the 10-class Fashion-MNIST
//! classifier. Leaves the trained model at `build/fashion.json`.

use hyperdense::{
    evaluate, load_fashion, train_loop, Adam, ActivationFunction, Hyperband, HyperbandConfig,
    HyperparameterSample, Network, SearchSpace, TrainConfig, PIXELS,
};

const N_CLASSES: usize = 10;

/// Two ReLU hidden layers sharing one width choice, then a softmax readout.
fn build_model(hp: &HyperparameterSample) -> Network {
    let units = hp.int("units");
    Network::new(vec![
        (units, PIXELS, ActivationFunction::ReLU),
        (units, units, ActivationFunction::ReLU),
        (N_CLASSES, units, ActivationFunction::Softmax),
    ])
}

fn main() {
    let dataset = load_fashion();
    let images = dataset.normalized_images();
    let labels = &dataset.labels;

    // The fashion concatenation has 70'000 examples:
    //      0 -> 58'000  train
    // 58'000 -> 60'000  validate
    // 60'000 -> 70'000  test
    let x_train = &images[..58_000];
    let y_train = &labels[..58_000];
    let x_val = &images[58_000..60_000];
    let y_val = &labels[58_000..60_000];
    let x_test = &images[60_000..];
    let y_test = &labels[60_000..];

    let space = SearchSpace::new().choice_int("units", &[32, 40, 50]);
    space.summary();

    let tuner = Hyperband::new(
        space,
        HyperbandConfig {
            max_epochs: 5,
            factor: 3,
            iterations: 30,
            directory: "build".to_string(),
            project_name: "tune_fashion_hyperparameters".to_string(),
            overwrite: true,
        },
    )
    .expect("failed to prepare tuner directory");

    let outcome = tuner
        .search(build_model, x_train, y_train, x_val, y_val)
        .expect("hyperparameter search failed");
    println!("best configuration: {} (loss {:.4})", outcome.best, outcome.best_loss);

    let mut best_model = build_model(&outcome.best);
    best_model.summary();

    let mut optimizer = Adam::new(&best_model);
    train_loop(
        &mut best_model,
        x_train,
        y_train,
        Some((x_val, y_val)),
        &mut optimizer,
        &TrainConfig::new(40, 64).verbose(),
    );

    println!();
    println!("TESTING :");
    let (loss, accuracy) = evaluate(&mut best_model, x_test, y_test);
    println!("Loss: {:.2}%", loss * 100.0);
    println!("Accuracy: {:.2}%", accuracy * 100.0);

    best_model
        .save_json("build/fashion.json")
        .expect("failed to save model");
}
