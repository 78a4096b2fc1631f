/// Classification layer: normalisation, training, inference, input checks.
///
/// ```text
///   SonarDataset
///        │
///        ▼
///   ┌─────────────┐
///   │ standardize  │  per-band mean / population std
///   └─────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │  logistic    │  2000 epochs of per-sample SGD → Model
///   └─────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │  predictor   │  Model + raw vector → label, confidence
///   └─────────────┘
///
///   validate: range check and dataset membership, run before predicting
/// ```

pub mod logistic;
pub mod predictor;
pub mod standardize;
pub mod validate;
