use log::trace;
use serde::Serialize;

use crate::data::model::{FeatureVector, Label};
use crate::error::EngineError;

use super::logistic::Model;

/// Outcome of classifying one vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of the chosen label; at least 0.5.
    pub confidence: f64,
    pub raw_class: char,
}

/// Classify `features` with `model`. `None` means nothing has been trained yet.
///
/// `p > 0.5` is a mine; exactly 0.5 falls on the rock side.
pub fn predict(features: &FeatureVector, model: Option<&Model>) -> Result<PredictionResult, EngineError> {
    let model = model.ok_or(EngineError::NotTrained)?;
    let probability = model.probability(features);

    let (label, confidence) = if probability > 0.5 {
        (Label::Mine, probability)
    } else {
        (Label::Rock, 1.0 - probability)
    };
    trace!(
        target: "rusty_sonar::predictor",
        "p(mine)={probability:.6} -> {label} ({confidence:.4})"
    );

    Ok(PredictionResult {
        label,
        confidence,
        raw_class: label.code(),
    })
}
