//! Fixtures shared by the unit tests.

use crate::data::loader::{MalformedPolicy, TextSource};
use crate::data::model::{Label, Sample, SonarDataset, FEATURE_COUNT};
use crate::state::PredictionService;

/// One source line: `value` repeated 60 times, then `label`.
pub fn row(value: f64, label: &str) -> String {
    let mut parts: Vec<String> = (0..FEATURE_COUNT).map(|_| format!("{value}")).collect();
    parts.push(label.to_string());
    parts.join(",")
}

pub fn uniform_sample(id: usize, value: f64, label: Label) -> Sample {
    Sample {
        id,
        features: [value; FEATURE_COUNT],
        label,
    }
}

pub fn dataset_of(samples: Vec<Sample>) -> SonarDataset {
    SonarDataset::from_samples(samples)
}

/// `n` flat samples from 0 upwards; above 0.5 is a mine.
pub fn ramp_dataset(n: usize) -> SonarDataset {
    dataset_of(
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                let label = if x > 0.5 { Label::Mine } else { Label::Rock };
                uniform_sample(i + 1, x, label)
            })
            .collect(),
    )
}

/// Mine `[0.5; 60]` (id 1) and rock `[0.1; 60]` (id 2); demo source holds the
/// same two rows.
pub fn two_point_service() -> PredictionService {
    let text = format!("{}\n{}\n", row(0.5, "M"), row(0.1, "R"));
    PredictionService::new(
        TextSource::inline("train", text.clone()),
        TextSource::inline("samples", text),
        MalformedPolicy::Reject,
    )
}
