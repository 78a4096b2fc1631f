use serde_json::Value;

use crate::api::dataset::{handle_dataset, DatasetQuery};
use crate::api::predict::handle_predict;
use crate::api::sample::handle_sample;
use crate::api::ApiResponse;
use crate::config::SonarConfig;
use crate::state::PredictionService;

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

/// The operations a front end can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Body of a predict request: `{ features, validateStrict? }`.
    Predict(Value),
    Sample,
    Dataset(DatasetQuery),
}

pub struct SonarApp {
    pub service: PredictionService,
}

impl SonarApp {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }

    pub fn from_config(config: &SonarConfig) -> Self {
        Self::new(PredictionService::from_config(config))
    }

    pub fn handle(&self, route: Route) -> ApiResponse {
        match route {
            Route::Predict(body) => handle_predict(&self.service, &body),
            Route::Sample => handle_sample(&self.service, &mut rand::thread_rng()),
            Route::Dataset(query) => handle_dataset(&self.service, &query),
        }
    }
}
