use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use once_cell::sync::OnceCell;
use rand::Rng;

use crate::classifier::logistic::{train, Model};
use crate::classifier::predictor::{predict, PredictionResult};
use crate::config::SonarConfig;
use crate::data::loader::{load_dataset, MalformedPolicy, TextSource};
use crate::data::model::{FeatureVector, Label, SonarDataset};
use crate::data::sampler::{pick_from_source, PickedSample};
use crate::error::{EngineError, LoadError, SampleError};

// ---------------------------------------------------------------------------
// Service state
// ---------------------------------------------------------------------------

/// Shared state behind every request, independent of transport.
///
/// The dataset and the model are built on first use and then only read. Both
/// caches are single-flight: concurrent first callers block on one build and
/// all see the same result.
pub struct PredictionService {
    dataset_source: TextSource,
    sample_source: TextSource,
    policy: MalformedPolicy,

    dataset: OnceCell<SonarDataset>,
    model: OnceCell<Model>,

    /// Number of completed training runs.
    training_runs: AtomicUsize,
}

impl PredictionService {
    pub fn new(dataset_source: TextSource, sample_source: TextSource, policy: MalformedPolicy) -> Self {
        Self {
            dataset_source,
            sample_source,
            policy,
            dataset: OnceCell::new(),
            model: OnceCell::new(),
            training_runs: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &SonarConfig) -> Self {
        Self::new(
            TextSource::file(&config.dataset_path),
            TextSource::file(&config.samples_path),
            config.malformed,
        )
    }

    /// The training set, loaded on first call.
    pub fn dataset(&self) -> Result<&SonarDataset, LoadError> {
        self.dataset.get_or_try_init(|| {
            let dataset = load_dataset(&self.dataset_source, self.policy)?;
            info!(
                target: "rusty_sonar::state",
                "Loaded {} samples from {} ({} rock, {} mine)",
                dataset.len(),
                self.dataset_source.name(),
                dataset.count(Label::Rock),
                dataset.count(Label::Mine)
            );
            Ok(dataset)
        })
    }

    /// The model, trained on first call. Training runs at most once per
    /// service even under concurrent first use.
    pub fn ensure_model(&self) -> Result<&Model, EngineError> {
        self.model.get_or_try_init(|| {
            let dataset = self.dataset()?;
            info!(
                target: "rusty_sonar::state",
                "Training model on {} samples",
                dataset.len()
            );
            let model = train(dataset);
            self.training_runs.fetch_add(1, Ordering::SeqCst);
            Ok(model)
        })
    }

    /// The model if it has already been built.
    pub fn model(&self) -> Option<&Model> {
        self.model.get()
    }

    /// Predict with whatever model exists now; never trains.
    pub fn predict_cached(&self, features: &FeatureVector) -> Result<PredictionResult, EngineError> {
        predict(features, self.model())
    }

    /// Train if needed, then predict.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, EngineError> {
        let model = self.ensure_model()?;
        predict(features, Some(model))
    }

    /// Random demo row, read fresh from the sample source.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PickedSample, SampleError> {
        pick_from_source(&self.sample_source, self.policy, rng)
    }

    pub fn training_runs(&self) -> usize {
        self.training_runs.load(Ordering::SeqCst)
    }

    /// Drop the cached dataset and model; the next request rebuilds both.
    pub fn reset(&mut self) {
        self.dataset.take();
        self.model.take();
    }
}
