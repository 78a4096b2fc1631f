//! Service configuration: where the two text sources live and how strictly
//! they are parsed.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::loader::MalformedPolicy;

pub const DEFAULT_DATASET_PATH: &str = "public/sonar.csv";
pub const DEFAULT_SAMPLES_PATH: &str = "public/sonar_samples.txt";

pub const ENV_DATASET: &str = "SONAR_DATASET";
pub const ENV_SAMPLES: &str = "SONAR_SAMPLES";
pub const ENV_MALFORMED: &str = "SONAR_MALFORMED";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{variable} must be 'reject' or 'nan', got '{value}'")]
    InvalidPolicy { variable: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SonarConfig {
    /// Training table (60 bands + label per line).
    pub dataset_path: PathBuf,
    /// Demo rows served by the sample picker.
    pub samples_path: PathBuf,
    pub malformed: MalformedPolicy,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            samples_path: PathBuf::from(DEFAULT_SAMPLES_PATH),
            malformed: MalformedPolicy::Reject,
        }
    }
}

impl SonarConfig {
    /// Defaults overlaid with `SONAR_DATASET`, `SONAR_SAMPLES` and
    /// `SONAR_MALFORMED` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_DATASET) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_SAMPLES) {
            config.samples_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_MALFORMED) {
            config.malformed = parse_policy(&value).ok_or_else(|| ConfigError::InvalidPolicy {
                variable: ENV_MALFORMED.to_string(),
                value,
            })?;
        }
        Ok(config)
    }
}

fn parse_policy(value: &str) -> Option<MalformedPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reject" => Some(MalformedPolicy::Reject),
        "nan" => Some(MalformedPolicy::KeepNan),
        _ => None,
    }
}
