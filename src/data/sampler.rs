use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::SampleError;

use super::loader::{parse_record, reader_for, MalformedPolicy, TextSource};
use super::model::{ActualLabel, FeatureVector};

/// A demo row handed to the caller, with its known answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedSample {
    #[serde(with = "crate::data::model::feature_array")]
    pub features: FeatureVector,
    pub actual_label: ActualLabel,
}

/// Pick one non-blank line uniformly at random and parse it.
pub fn pick_random<R: Rng + ?Sized>(
    text: &str,
    source_name: &str,
    policy: MalformedPolicy,
    rng: &mut R,
) -> Result<PickedSample, SampleError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    let &(index, line) = lines.choose(rng).ok_or(SampleError::NoSamples)?;
    debug!(
        target: "rusty_sonar::sampler",
        "Picked line {} of {} usable rows in {source_name}",
        index + 1,
        lines.len()
    );

    let mut reader = reader_for(line);
    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|source| crate::error::LoadError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
    if !found {
        return Err(SampleError::NoSamples);
    }

    let row = parse_record(&record, index as u64 + 1, source_name, policy)?;
    Ok(PickedSample {
        features: row.features,
        actual_label: ActualLabel::from_code(row.label.as_deref()),
    })
}

/// Read `source` fresh and pick from it. Nothing is cached.
pub fn pick_from_source<R: Rng + ?Sized>(
    source: &TextSource,
    policy: MalformedPolicy,
    rng: &mut R,
) -> Result<PickedSample, SampleError> {
    let text = source.read()?;
    pick_random(&text, &source.name(), policy, rng)
}
