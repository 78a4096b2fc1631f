use serde::Serialize;

use crate::data::model::{FeatureVector, SonarDataset, FEATURE_COUNT};

/// Per-band mean and population standard deviation of the training set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizationStats {
    #[serde(with = "crate::data::model::feature_array")]
    pub mean: FeatureVector,
    #[serde(with = "crate::data::model::feature_array")]
    pub std: FeatureVector,
}

impl StandardizationStats {
    /// Fit over every sample. Uses the population variance (divide by N); a
    /// band with zero spread gets `std = 1` so it is only centred.
    pub fn fit(dataset: &SonarDataset) -> Self {
        let n = dataset.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [0.0; FEATURE_COUNT];

        for sample in &dataset.samples {
            for (m, x) in mean.iter_mut().zip(sample.features.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        for sample in &dataset.samples {
            for i in 0..FEATURE_COUNT {
                std[i] += (sample.features[i] - mean[i]).powi(2);
            }
        }
        for s in &mut std {
            let dev = (*s / n).sqrt();
            // NaN is treated like zero here, matching the legacy data path.
            *s = if dev == 0.0 || dev.is_nan() { 1.0 } else { dev };
        }

        StandardizationStats { mean, std }
    }

    /// `(x[i] - mean[i]) / std[i]` for every band.
    pub fn apply(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (features[i] - self.mean[i]) / self.std[i];
        }
        out
    }
}
