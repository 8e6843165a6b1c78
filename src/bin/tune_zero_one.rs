//! Hyperband search plus final training for the two-class digit classifier
//! over the filtered zero/one subset. Leaves the trained model at
//! `build/zero_one.json`.

use hyperdense::{
    evaluate, keep_zeros_and_ones, load_mnist, train_loop, Adam, ActivationFunction, Hyperband,
    HyperbandConfig, HyperparameterSample, Network, SearchSpace, TrainConfig, PIXELS,
};

const N_CLASSES: usize = 2;

/// One hidden layer with tunable width and activation, then a two-way
/// softmax readout.
fn build_model(hp: &HyperparameterSample) -> Network {
    let units = hp.int("units");
    let activation = ActivationFunction::from_name(hp.name("activation"));
    Network::new(vec![
        (units, PIXELS, activation),
        (N_CLASSES, units, ActivationFunction::Softmax),
    ])
}

fn main() {
    let dataset = keep_zeros_and_ones(load_mnist());
    let images = dataset.normalized_images();
    let labels = &dataset.labels;
    let n = images.len();

    // Split ratios mirror the full-dataset splits, scaled to the ~14'780
    // zero/one examples:
    //
    //               Full dataset    ZeroOne dataset
    // Train + val       60'000          ~14'780 - 2'500
    // Validate           2'000              500
    // Test              10'000            2'500
    let x_train = &images[..n - 3_000];
    let y_train = &labels[..n - 3_000];
    let x_val = &images[n - 3_000..n - 2_500];
    let y_val = &labels[n - 3_000..n - 2_500];
    let x_test = &images[n - 2_500..];
    let y_test = &labels[n - 2_500..];

    let space = SearchSpace::new()
        .choice_int("units", &[16, 20, 24, 28, 32])
        .choice_name(
            "activation",
            &["relu", "leaky_relu", "relu6", "tanh", "sigmoid"],
        );
    space.summary();

    let tuner = Hyperband::new(
        space,
        HyperbandConfig {
            max_epochs: 5,
            factor: 3,
            iterations: 30,
            directory: "build".to_string(),
            project_name: "tune_zero_one_hyperparameters".to_string(),
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
        .save_json("build/zero_one.json")
        .expect("failed to save model");
}
