use serde::Serialize;

use crate::data::filter::{paginate, DatasetPage, LabelFilter, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::data::model::Sample;
use crate::error::ValidationError;
use crate::state::PredictionService;

use super::{respond, ApiError, ApiResponse};

/// Browse parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetResponse {
    Single { sample: Sample },
    Page(DatasetPage),
}

fn positive(parameter: &str, raw: Option<&str>, default: usize) -> Result<usize, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(ValidationError::InvalidQuery {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        }),
    }
}

pub fn run_dataset(service: &PredictionService, query: &DatasetQuery) -> Result<DatasetResponse, ApiError> {
    let dataset = service
        .dataset()
        .map_err(|err| ApiError::internal("Failed to load dataset", err))?;

    if let Some(id) = query.id.as_deref() {
        let id = positive("id", Some(id), 1)?;
        return dataset
            .get(id)
            .map(|sample| DatasetResponse::Single {
                sample: sample.clone(),
            })
            .ok_or_else(|| ApiError::NotFound("Sample not found".to_string()));
    }

    let page = positive("page", query.page.as_deref(), DEFAULT_PAGE)?;
    let limit = positive("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;
    let filter = query
        .filter
        .as_deref()
        .map(LabelFilter::from_query)
        .unwrap_or_default();

    Ok(DatasetResponse::Page(paginate(dataset, filter, page, limit)))
}

pub fn handle_dataset(service: &PredictionService, query: &DatasetQuery) -> ApiResponse {
    respond(run_dataset(service, query))
}
