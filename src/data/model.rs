use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of frequency bands in every sonar return.
pub const FEATURE_COUNT: usize = 60;

/// One sonar return: 60 band energies, nominally in `[0, 1]`.
pub type FeatureVector = [f64; FEATURE_COUNT];

// ---------------------------------------------------------------------------
// Label – the two classes of the training set
// ---------------------------------------------------------------------------

/// Training label. Serialised with the single-letter codes used in the source
/// files (`"R"` / `"M"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "R")]
    Rock,
    #[serde(rename = "M")]
    Mine,
}

impl Label {
    /// Interpret a label token from the training source. Only an exact `M`
    /// means mine; anything else (including a missing label) is a rock.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("M") => Label::Mine,
            _ => Label::Rock,
        }
    }

    pub fn code(self) -> char {
        match self {
            Label::Rock => 'R',
            Label::Mine => 'M',
        }
    }

    /// Regression target: 1 for mine, 0 for rock.
    pub fn target(self) -> f64 {
        match self {
            Label::Mine => 1.0,
            Label::Rock => 0.0,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Rock => write!(f, "Rock"),
            Label::Mine => write!(f, "Mine"),
        }
    }
}

// ---------------------------------------------------------------------------
// ActualLabel – label reported for demo samples
// ---------------------------------------------------------------------------

/// Label of a demo sample. Unlike [`Label`] an unrecognised code is kept
/// visible as `Unknown` instead of collapsing to rock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActualLabel {
    Rock,
    Mine,
    Unknown,
}

impl ActualLabel {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("R") => ActualLabel::Rock,
            Some("M") => ActualLabel::Mine,
            _ => ActualLabel::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Sample – one row of the training source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// 1-based position in the source file.
    pub id: usize,
    #[serde(with = "feature_array")]
    pub features: FeatureVector,
    pub label: Label,
}

// ---------------------------------------------------------------------------
// SonarDataset – the complete loaded training set
// ---------------------------------------------------------------------------

/// The full training set in file order. Never empty once loaded.
#[derive(Debug, Clone)]
pub struct SonarDataset {
    pub samples: Vec<Sample>,
}

impl SonarDataset {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        SonarDataset { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Look a sample up by its 1-based id.
    pub fn get(&self, id: usize) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    pub fn count(&self, label: Label) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }
}

/// serde has no built-in impls for `[T; 60]`; go through a slice.
pub(crate) mod feature_array {
    use serde::ser::SerializeSeq;
    use serde::Serializer;

    use super::FeatureVector;

    pub fn serialize<S: Serializer>(features: &FeatureVector, s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(features.len()))?;
        for v in features {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}
