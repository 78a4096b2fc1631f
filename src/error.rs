use std::io;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Failure to turn a text source into samples.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("{source_name}: malformed record: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name} line {line}, column {column}: '{token}' is not a number")]
    MalformedValue {
        source_name: String,
        line: u64,
        /// 1-based column.
        column: usize,
        token: String,
    },

    #[error("{source_name} contains no samples")]
    Empty { source_name: String },
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Rejected caller input. Always surfaced as a 400.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid features. Expected exactly 60 numbers.")]
    WrongLength { got: Option<usize> },

    #[error("Feature {index} is not a number. Got: {raw}")]
    NotNumeric { index: usize, raw: String },

    #[error("Feature {index} must be between 0 and 1. Got: {}", display_number(.value))]
    OutOfRange { index: usize, value: f64 },

    #[error(
        "This data is not from the trained dataset. Please use values from the sonar dataset or load a sample."
    )]
    NotFromDataset,

    #[error("Invalid value for '{parameter}': {value}")]
    InvalidQuery { parameter: String, value: String },
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Plain notation inside `[1e-6, 1e21)`, exponent notation (`1e+25`, `-1e-7`)
/// outside it.
fn display_number(value: &f64) -> String {
    let magnitude = value.abs();
    if *value == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Prediction attempted before the model was built.
    #[error("model not trained")]
    NotTrained,
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No samples available")]
    NoSamples,
}
