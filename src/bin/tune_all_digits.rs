//! Hyperband search plus final training for the 10-class digit classifier.
//! Leaves the trained model at `build/all_digits.json`.

use hyperdense::{
    evaluate, load_mnist, train_loop, Adam, ActivationFunction, Hyperband, HyperbandConfig,
    HyperparameterSample, Network, SearchSpace, TrainConfig, PIXELS,
};

const N_CLASSES: usize = 10;

/// Two hidden layers sharing one width and one activation choice, then a
/// softmax readout. Images arrive pre-flattened to 784 values.
fn build_model(hp: &HyperparameterSample) -> Network {
    let units = hp.int("units");
    let activation = ActivationFunction::from_name(hp.name("activation"));
    Network::new(vec![
        (units, PIXELS, activation.clone()),
        (units, units, activation),
        (N_CLASSES, units, ActivationFunction::Softmax),
    ])
}

fn main() {
    let dataset = load_mnist();
    let images = dataset.normalized_images();
    let labels = &dataset.labels;

    // Small fixed slices of the canonical 70k concatenation: 2k train, the
    // next 2k for validation, and the canonical 10k test partition at the
    // tail. The validation slice is deliberately disjoint from the training
    // slice.
    let x_train = &images[..2_000];
    let y_train = &labels[..2_000];
    let x_val = &images[2_000..4_000];
    let y_val = &labels[2_000..4_000];
    let x_test = &images[60_000..];
    let y_test = &labels[60_000..];

    let space = SearchSpace::new()
        .choice_int("units", &[24, 32, 40])
        .choice_name("activation", &["relu", "tanh", "sigmoid"]);
    space.summary();

    let tuner = Hyperband::new(
        space,
        HyperbandConfig {
            max_epochs: 5,
            factor: 3,
            iterations: 10,
            directory: "build".to_string(),
            project_name: "tune_all_digits_hyperparameters".to_string(),
            overwrite: true,
        },
    )
    .expect("failed to prepare tuner directory");

    let outcome = tuner
        .search(build_model, x_train, y_train, x_val, y_val)
        .expect("hyperparameter search failed");
    println!("best configuration: {} (loss {:.4})", outcome.best, outcome.best_loss);

    // Retrain the winning configuration from scratch on the full training
    // slice, validating every epoch.
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
        .save_json("build/all_digits.json")
        .expect("failed to save model");
}
