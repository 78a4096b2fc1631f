use std::fmt;
use std::path::PathBuf;

use csv::StringRecord;
use log::{debug, warn};

use crate::error::LoadError;

use super::model::{FeatureVector, Label, Sample, SonarDataset, FEATURE_COUNT};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where a comma-separated sonar table comes from.
#[derive(Debug, Clone)]
pub enum TextSource {
    File(PathBuf),
    /// In-memory text, mostly for tests and embedding.
    Inline { name: String, text: String },
}

impl TextSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        TextSource::File(path.into())
    }

    pub fn inline(name: &str, text: impl Into<String>) -> Self {
        TextSource::Inline {
            name: name.to_string(),
            text: text.into(),
        }
    }

    /// Human-readable name used in logs and errors.
    pub fn name(&self) -> String {
        match self {
            TextSource::File(path) => path.display().to_string(),
            TextSource::Inline { name, .. } => name.clone(),
        }
    }

    pub fn read(&self) -> Result<String, LoadError> {
        match self {
            TextSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                    source_name: self.name(),
                    source,
                })
            }
            TextSource::Inline { text, .. } => Ok(text.clone()),
        }
    }
}

/// What to do with a feature token that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the load, naming the offending line and column.
    #[default]
    Reject,
    /// Keep the row with `NaN` in place of the token and log a warning.
    KeepNan,
}

// ---------------------------------------------------------------------------
// Token parsing
// ---------------------------------------------------------------------------

/// A feature token that could not be read as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedToken(pub String);

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number", self.0)
    }
}

/// Parse one feature token. Surrounding whitespace is ignored; an empty token
/// is malformed.
pub fn parse_feature(token: &str) -> Result<f64, MalformedToken> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(MalformedToken(token.to_string()));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| MalformedToken(token.to_string()))
}

/// One parsed row: 60 features and the trimmed label token, if any.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub features: FeatureVector,
    pub label: Option<String>,
}

/// Turn one CSV record into features + label. Columns beyond the 61st are
/// ignored; a missing feature column counts as malformed.
pub fn parse_record(
    record: &StringRecord,
    line: u64,
    source_name: &str,
    policy: MalformedPolicy,
) -> Result<ParsedRow, LoadError> {
    let mut features = [0.0; FEATURE_COUNT];
    for (col, slot) in features.iter_mut().enumerate() {
        let token = record.get(col).unwrap_or("");
        *slot = match parse_feature(token) {
            Ok(v) => v,
            Err(MalformedToken(token)) => match policy {
                MalformedPolicy::Reject => {
                    return Err(LoadError::MalformedValue {
                        source_name: source_name.to_string(),
                        line,
                        column: col + 1,
                        token,
                    });
                }
                MalformedPolicy::KeepNan => {
                    warn!(
                        target: "rusty_sonar::loader",
                        "{source_name} line {line}, column {}: '{token}' is not a number, using NaN",
                        col + 1
                    );
                    f64::NAN
                }
            },
        };
    }

    let label = record
        .get(FEATURE_COUNT)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    Ok(ParsedRow { features, label })
}

/// Reader configured for the headerless sonar format.
pub(crate) fn reader_for(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Dataset loader
// ---------------------------------------------------------------------------

/// Parse the training table. Blank lines are skipped; ids follow the order of
/// the remaining rows starting at 1.
pub fn parse_dataset(
    text: &str,
    source_name: &str,
    policy: MalformedPolicy,
) -> Result<SonarDataset, LoadError> {
    let mut reader = reader_for(text);
    let mut samples = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = parse_record(&record, line, source_name, policy)?;

        samples.push(Sample {
            id: samples.len() + 1,
            features: row.features,
            label: Label::from_code(row.label.as_deref()),
        });
    }

    if samples.is_empty() {
        return Err(LoadError::Empty {
            source_name: source_name.to_string(),
        });
    }

    let dataset = SonarDataset::from_samples(samples);
    debug!(
        target: "rusty_sonar::loader",
        "Parsed {} samples from {source_name} ({} rock, {} mine)",
        dataset.len(),
        dataset.count(Label::Rock),
        dataset.count(Label::Mine)
    );
    Ok(dataset)
}

/// Read and parse a training source.
pub fn load_dataset(source: &TextSource, policy: MalformedPolicy) -> Result<SonarDataset, LoadError> {
    let text = source.read()?;
    parse_dataset(&text, &source.name(), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::row;

    #[test]
    fn parses_rows_and_assigns_sequential_ids() {
        let text = format!("{}\n\n   \n{}\n", row(0.1, "R"), row(0.5, "M"));
        let ds = parse_dataset(&text, "test", MalformedPolicy::Reject).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples[0].id, 1);
        assert_eq!(ds.samples[1].id, 2);
        assert_eq!(ds.samples[0].label, Label::Rock);
        assert_eq!(ds.samples[1].label, Label::Mine);
        assert_eq!(ds.samples[1].features[59], 0.5);
    }

    #[test]
    fn label_is_trimmed_and_defaults_to_rock() {
        let mut missing = row(0.2, "");
        missing.pop(); // drop trailing comma -> only 60 columns
        let text = format!("{}\n{}\r\n{}\n", row(0.3, "M  "), missing, row(0.4, "M\r"));
        let ds = parse_dataset(&text, "test", MalformedPolicy::Reject).unwrap();
        assert_eq!(ds.samples[0].label, Label::Mine);
        assert_eq!(ds.samples[1].label, Label::Rock);
        assert_eq!(ds.samples[2].label, Label::Mine);
    }

    #[test]
    fn malformed_token_is_rejected_with_position() {
        let bad = row(0.1, "R").replacen("0.1", "abc", 1);
        let text = format!("{}\n{}\n", row(0.1, "R"), bad);
        let err = parse_dataset(&text, "sonar.csv", MalformedPolicy::Reject).unwrap_err();
        match err {
            LoadError::MalformedValue {
                line, column, token, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_policy_keeps_nan() {
        let bad = row(0.1, "M").replacen("0.1", "?", 1);
        let ds = parse_dataset(&bad, "test", MalformedPolicy::KeepNan).unwrap();
        assert!(ds.samples[0].features[0].is_nan());
        assert_eq!(ds.samples[0].features[1], 0.1);
        assert_eq!(ds.samples[0].label, Label::Mine);
    }

    #[test]
    fn short_row_is_malformed() {
        let text = "0.1,0.2,R\n";
        assert!(matches!(
            parse_dataset(text, "test", MalformedPolicy::Reject),
            Err(LoadError::MalformedValue { column: 3, .. })
        ));
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(matches!(
            parse_dataset("\n\n", "test", MalformedPolicy::Reject),
            Err(LoadError::Empty { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = TextSource::file("/definitely/not/here/sonar.csv");
        assert!(matches!(
            load_dataset(&source, MalformedPolicy::Reject),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("rusty-sonar-loader-{}.csv", std::process::id()));
        std::fs::write(&path, format!("{}\n{}\n", row(0.1, "R"), row(0.9, "M"))).unwrap();
        let ds = load_dataset(&TextSource::file(&path), MalformedPolicy::Reject).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn feature_tokens_are_parsed_explicitly() {
        assert_eq!(parse_feature(" 0.25 "), Ok(0.25));
        assert!(parse_feature("").is_err());
        assert!(parse_feature("0.2x").is_err());
    }
}
