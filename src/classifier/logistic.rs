use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use crate::data::model::{FeatureVector, SonarDataset, FEATURE_COUNT};

use super::standardize::StandardizationStats;

pub const LEARNING_RATE: f64 = 0.1;
pub const EPOCHS: usize = 2000;

/// Scores are clamped to this magnitude before `exp` so it cannot overflow.
const SCORE_CLAMP: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingSettings {
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            epochs: EPOCHS,
            learning_rate: LEARNING_RATE,
        }
    }
}

/// Trained parameters plus the normalisation they were fitted under.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Model {
    #[serde(with = "crate::data::model::feature_array")]
    pub weights: FeatureVector,
    pub bias: f64,
    pub stats: StandardizationStats,
}

impl Model {
    /// Probability that an already standardized vector is a mine.
    pub fn probability_standardized(&self, x: &FeatureVector) -> f64 {
        sigmoid(self.bias + dot(&self.weights, x))
    }

    /// Probability that a raw vector is a mine.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        self.probability_standardized(&self.stats.apply(features))
    }
}

/// Fit with the fixed hyperparameters.
pub fn train(dataset: &SonarDataset) -> Model {
    train_with(dataset, TrainingSettings::default())
}

/// Per-sample stochastic gradient descent in dataset order, no shuffling and
/// no early stopping. Deterministic for a given dataset.
pub fn train_with(dataset: &SonarDataset, settings: TrainingSettings) -> Model {
    let started = Instant::now();
    let stats = StandardizationStats::fit(dataset);

    let rows: Vec<(FeatureVector, f64)> = dataset
        .samples
        .iter()
        .map(|s| (stats.apply(&s.features), s.label.target()))
        .collect();

    let mut weights = [0.0; FEATURE_COUNT];
    let mut bias = 0.0;
    let lr = settings.learning_rate;

    for _ in 0..settings.epochs {
        for (x, y) in &rows {
            let prediction = sigmoid(bias + dot(&weights, x));
            let error = prediction - y;

            bias -= lr * error;
            for (w, xj) in weights.iter_mut().zip(x.iter()) {
                *w -= lr * error * xj;
            }
        }
    }

    info!(
        target: "rusty_sonar::logistic",
        "Trained on {} samples for {} epochs in {:.2?} (bias={:.4})",
        rows.len(),
        settings.epochs,
        started.elapsed(),
        bias
    );
    if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
        warn!(
            target: "rusty_sonar::logistic",
            "Training produced non-finite parameters; predictions will carry NaN confidence"
        );
    }

    Model {
        weights,
        bias,
        stats,
    }
}

/// Logistic function with the input clamped to `[-500, 500]`.
pub fn sigmoid(value: f64) -> f64 {
    let z = value.clamp(-SCORE_CLAMP, SCORE_CLAMP);
    1.0 / (1.0 + (-z).exp())
}

fn dot(weights: &FeatureVector, features: &FeatureVector) -> f64 {
    weights
        .iter()
        .zip(features.iter())
        .map(|(w, f)| w * f)
        .sum()
}
