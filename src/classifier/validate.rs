use crate::data::model::{FeatureVector, Sample, SonarDataset};
use crate::error::ValidationError;

/// Per-band absolute tolerance for matching a known sample.
pub const MEMBERSHIP_TOLERANCE: f64 = 0.0001;

/// First sample (in dataset order) whose every band is within
/// [`MEMBERSHIP_TOLERANCE`] of `features`.
pub fn find_known_sample<'a>(features: &FeatureVector, dataset: &'a SonarDataset) -> Option<&'a Sample> {
    dataset.samples.iter().find(|sample| {
        !sample
            .features
            .iter()
            .zip(features.iter())
            .any(|(a, b)| (a - b).abs() > MEMBERSHIP_TOLERANCE)
    })
}

pub fn is_known_sample(features: &FeatureVector, dataset: &SonarDataset) -> bool {
    find_known_sample(features, dataset).is_some()
}

/// Every band must lie in `[0, 1]`. Reports the first offender with a 1-based
/// index.
pub fn check_range(features: &[f64]) -> Result<(), ValidationError> {
    match features
        .iter()
        .position(|v| !(0.0..=1.0).contains(v))
    {
        Some(i) => Err(ValidationError::OutOfRange {
            index: i + 1,
            value: features[i],
        }),
        None => Ok(()),
    }
}
