/// Data layer: core types, loading, browsing and demo samples.
///
/// Architecture:
/// ```text
///  sonar.csv            sonar_samples.txt
///      │                       │
///      ▼                       ▼
///   ┌──────────┐          ┌──────────┐
///   │  loader   │          │ sampler   │  one random row per call
///   └──────────┘          └──────────┘
///      │
///      ▼
///   ┌──────────────┐
///   │ SonarDataset  │  Vec<Sample>, 1-based ids
///   └──────────────┘
///      │
///      ▼
///   ┌──────────┐
///   │  filter   │  label filter + pagination
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sampler;
