use log::debug;
use serde::Serialize;

use super::model::{Label, Sample, SonarDataset};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Label filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFilter {
    #[default]
    All,
    Rock,
    Mine,
}

impl LabelFilter {
    /// `rock` / `mine` select one class; anything else shows everything.
    pub fn from_query(value: &str) -> Self {
        match value {
            "rock" => LabelFilter::Rock,
            "mine" => LabelFilter::Mine,
            "all" => LabelFilter::All,
            other => {
                debug!(target: "rusty_sonar::filter", "Unknown filter '{other}', showing all");
                LabelFilter::All
            }
        }
    }

    fn accepts(self, sample: &Sample) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Rock => sample.label == Label::Rock,
            LabelFilter::Mine => sample.label == Label::Mine,
        }
    }
}

/// Indices of samples passing `filter`, in dataset order.
pub fn filtered_indices(dataset: &SonarDataset, filter: LabelFilter) -> Vec<usize> {
    dataset
        .samples
        .iter()
        .enumerate()
        .filter(|(_, s)| filter.accepts(s))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Class counts over the whole dataset. Labels are already folded to
/// [`Label`] at load time, so a row whose code was not exactly `M` (`m`, `X`,
/// missing) counts as a rock here and under the `rock` filter, and
/// `rocks + mines == total` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub rocks: usize,
    pub mines: usize,
}

impl DatasetStats {
    pub fn of(dataset: &SonarDataset) -> Self {
        DatasetStats {
            total: dataset.len(),
            rocks: dataset.count(Label::Rock),
            mines: dataset.count(Label::Mine),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPage {
    pub items: Vec<Sample>,
    pub pagination: Pagination,
    pub stats: DatasetStats,
}

/// One page of the filtered dataset. `page` is 1-based and both `page` and
/// `limit` must be at least 1. A page past the end is empty.
pub fn paginate(dataset: &SonarDataset, filter: LabelFilter, page: usize, limit: usize) -> DatasetPage {
    debug_assert!(page >= 1 && limit >= 1);
    let indices = filtered_indices(dataset, filter);
    let total_items = indices.len();

    let items = indices
        .iter()
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .map(|&i| dataset.samples[i].clone())
        .collect();

    DatasetPage {
        items,
        pagination: Pagination {
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit),
        },
        stats: DatasetStats::of(dataset),
    }
}
