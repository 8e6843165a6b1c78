use std::io;
use std::path::PathBuf;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::network::network::Network;
use crate::optim::adam::Adam;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;
use crate::tune::space::{HyperparameterSample, SearchSpace};

/// Mini-batch size for trial models; only the final refit uses a
/// caller-chosen one.
const TRIAL_BATCH_SIZE: usize = 32;

/// Settings for a Hyperband search.
///
/// `directory`/`project_name` name the on-disk search-state location
/// (`{directory}/{project_name}/`), which is wiped first when `overwrite`
/// is set so stale trial logs never leak into a new run.
pub struct HyperbandConfig {
    /// Epoch budget a surviving configuration is ultimately trained for.
    pub max_epochs: usize,
    /// Successive-halving reduction factor (η).
    pub factor: usize,
    /// Number of times the full bracket sweep is repeated.
    pub iterations: usize,
    pub directory: String,
    pub project_name: String,
    pub overwrite: bool,
}

/// One trained-and-scored configuration from the search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    pub sample: HyperparameterSample,
    /// Epochs this trial was trained for (its rung budget).
    pub epochs: usize,
    /// Final-epoch training loss, the search objective.
    pub loss: f64,
    /// Validation loss at the end of the trial, kept for the record.
    pub val_loss: f64,
    pub iteration: usize,
    pub bracket: usize,
    pub rung: usize,
}

/// What a finished search hands back: the winning configuration, its
/// objective value, and the full trial log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: HyperparameterSample,
    pub best_loss: f64,
    pub trials: Vec<TrialRecord>,
}

/// Multi-round successive-halving (Hyperband) search over an enumerated
/// space: cheap low-epoch sweeps over many configurations, with the epoch
/// budget multiplied by `factor` for the surviving fraction at each rung.
pub struct Hyperband {
    space: SearchSpace,
    config: HyperbandConfig,
    project_dir: PathBuf,
}

impl Hyperband {
    /// Prepares the search-state directory and returns the tuner.
    pub fn new(space: SearchSpace, config: HyperbandConfig) -> io::Result<Hyperband> {
        assert!(config.max_epochs >= 1, "max_epochs must be at least 1");
        assert!(config.factor >= 2, "halving factor must be at least 2");
        assert!(config.iterations >= 1, "iterations must be at least 1");
        assert!(!space.is_empty(), "search space has no parameters");

        let project_dir = PathBuf::from(&config.directory).join(&config.project_name);
        if config.overwrite && project_dir.exists() {
            std::fs::remove_dir_all(&project_dir)?;
        }
        std::fs::create_dir_all(&project_dir)?;

        Ok(Hyperband {
            space,
            config,
            project_dir,
        })
    }

    /// Runs the search and returns the best configuration by final training
    /// loss. `build_model` is invoked once per trial with a fresh sample;
    /// every trial trains from scratch for its rung budget against the
    /// training slice, scoring the validation slice for the trial log.
    pub fn search<F>(
        &self,
        build_model: F,
        x_train: &[Vec<f64>],
        y_train: &[u8],
        x_val: &[Vec<f64>],
        y_val: &[u8],
    ) -> io::Result<SearchOutcome>
    where
        F: Fn(&HyperparameterSample) -> Network,
    {
        let s_max = log_floor(self.config.max_epochs, self.config.factor);
        let mut trials: Vec<TrialRecord> = Vec::new();

        for iteration in 0..self.config.iterations {
            for s in (0..=s_max).rev() {
                // Bracket sizing: more configurations at lower budgets.
                let n = div_ceil(
                    (s_max + 1) * self.config.factor.pow(s as u32),
                    s + 1,
                );
                let r = (self.config.max_epochs / self.config.factor.pow(s as u32)).max(1);

                let mut candidates = self.draw_candidates(n);

                for rung in 0..=s {
                    let keep = (candidates.len() / self.config.factor).max(1);
                    let epochs = (r * self.config.factor.pow(rung as u32))
                        .min(self.config.max_epochs);

                    let mut scored: Vec<(f64, f64, HyperparameterSample)> = candidates
                        .drain(..)
                        .map(|sample| {
                            let (loss, val_loss) = run_trial(
                                &build_model,
                                &sample,
                                epochs,
                                x_train,
                                y_train,
                                x_val,
                                y_val,
                            );
                            println!(
                                "trial it={} bracket={} rung={} epochs={} {} -> loss {:.4}, val_loss {:.4}",
                                iteration, s, rung, epochs, sample, loss, val_loss
                            );
                            (loss, val_loss, sample)
                        })
                        .collect();

                    for (loss, val_loss, sample) in &scored {
                        trials.push(TrialRecord {
                            sample: sample.clone(),
                            epochs,
                            loss: *loss,
                            val_loss: *val_loss,
                            iteration,
                            bracket: s,
                            rung,
                        });
                    }

                    // Keep the best `keep` configurations for the next rung.
                    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
                    candidates = scored
                        .into_iter()
                        .take(keep)
                        .map(|(_, _, sample)| sample)
                        .collect();
                }
            }
        }

        let best = trials
            .iter()
            .min_by(|a, b| a.loss.partial_cmp(&b.loss).unwrap_or(std::cmp::Ordering::Equal))
            .expect("search produced no trials");
        let outcome = SearchOutcome {
            best: best.sample.clone(),
            best_loss: best.loss,
            trials,
        };

        self.persist(&outcome)?;
        Ok(outcome)
    }

    /// Shuffles the enumerated configurations and takes up to `n` of them.
    /// Tiny spaces simply get swept in full.
    fn draw_candidates(&self, n: usize) -> Vec<HyperparameterSample> {
        let mut samples = self.space.all_samples();
        samples.shuffle(&mut rand::thread_rng());
        samples.truncate(n);
        samples
    }

    fn persist(&self, outcome: &SearchOutcome) -> io::Result<()> {
        write_json(&self.project_dir.join("trials.json"), &outcome.trials)?;
        write_json(&self.project_dir.join("best.json"), &outcome.best)?;
        Ok(())
    }
}

fn run_trial<F>(
    build_model: &F,
    sample: &HyperparameterSample,
    epochs: usize,
    x_train: &[Vec<f64>],
    y_train: &[u8],
    x_val: &[Vec<f64>],
    y_val: &[u8],
) -> (f64, f64)
where
    F: Fn(&HyperparameterSample) -> Network,
{
    let mut model = build_model(sample);
    let mut optimizer = Adam::new(&model);
    let history = train_loop(
        &mut model,
        x_train,
        y_train,
        Some((x_val, y_val)),
        &mut optimizer,
        &TrainConfig::new(epochs, TRIAL_BATCH_SIZE),
    );
    let last = history.last().expect("trial trained for zero epochs");
    let val_loss = last.val_loss.unwrap_or(f64::INFINITY);
    (last.train_loss, val_loss)
}

fn write_json<T: Serialize>(path: &std::path::Path, value: &T) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Largest k with base^k <= n.
fn log_floor(n: usize, base: usize) -> usize {
    let mut k = 0;
    let mut power = base;
    while power <= n {
        k += 1;
        power *= base;
    }
    k
}

fn div_ceil(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}
