//! Sonar return classifier: tells mines from rocks with a logistic regression
//! trained on 60-band sonar energies.

pub mod api;
pub mod app;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{Route, SonarApp};
pub use config::SonarConfig;
pub use data::model::{FeatureVector, Label, FEATURE_COUNT};
pub use state::PredictionService;
