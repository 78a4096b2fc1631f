use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::classifier::validate::{check_range, is_known_sample};
use crate::data::model::{FeatureVector, FEATURE_COUNT};
use crate::error::ValidationError;
use crate::state::PredictionService;

use super::{respond, ApiError, ApiResponse};

pub const UNRELIABLE_INPUT_WARNING: &str =
    "Warning: This input is not from the training dataset. Results may be unreliable.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// `"Mine"` or `"Rock"`.
    pub result: String,
    /// Rounded to two decimals.
    pub confidence: f64,
    pub raw_class: char,
    pub is_from_dataset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Pull a 60-band vector out of a request body. Elements may be JSON numbers
/// or strings holding a finite number.
pub fn parse_features(body: &Value) -> Result<FeatureVector, ValidationError> {
    let raw = body
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ValidationError::WrongLength { got: None })?;
    if raw.len() != FEATURE_COUNT {
        return Err(ValidationError::WrongLength {
            got: Some(raw.len()),
        });
    }

    let mut features = [0.0; FEATURE_COUNT];
    for (i, (slot, value)) in features.iter_mut().zip(raw.iter()).enumerate() {
        *slot = numeric(value).ok_or_else(|| ValidationError::NotNumeric {
            index: i + 1,
            raw: value.to_string(),
        })?;
    }
    Ok(features)
}

fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// `validateStrict` is read by truthiness: `false`, `0`, `""`, `null` and a
/// missing key leave strict mode off; any other value turns it on.
fn strict_requested(body: &Value) -> bool {
    match body.get("validateStrict") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Validate, check membership, then classify. Strict rejection happens before
/// the model is touched.
pub fn run_predict(service: &PredictionService, body: &Value) -> Result<PredictResponse, ApiError> {
    let features = parse_features(body)?;
    check_range(&features)?;

    let dataset = service
        .dataset()
        .map_err(|err| ApiError::internal("Prediction failed", err))?;
    let is_from_dataset = is_known_sample(&features, dataset);

    if !is_from_dataset {
        if strict_requested(body) {
            info!(target: "rusty_sonar::api", "Strict mode: rejecting vector not in the training set");
            return Err(ValidationError::NotFromDataset.into());
        }
        debug!(target: "rusty_sonar::api", "Vector not in the training set, predicting with warning");
    }

    let prediction = service
        .predict(&features)
        .map_err(|err| ApiError::internal("Prediction failed", err))?;

    Ok(PredictResponse {
        result: prediction.label.to_string(),
        confidence: round2(prediction.confidence),
        raw_class: prediction.raw_class,
        is_from_dataset,
        warning: (!is_from_dataset).then(|| UNRELIABLE_INPUT_WARNING.to_string()),
    })
}

pub fn handle_predict(service: &PredictionService, body: &Value) -> ApiResponse {
    respond(run_predict(service, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{MalformedPolicy, TextSource};
    use crate::testing::{row, two_point_service};
    use serde_json::json;

    #[test]
    fn missing_or_short_features_are_rejected() {
        assert_eq!(
            parse_features(&json!({})),
            Err(ValidationError::WrongLength { got: None })
        );
        assert_eq!(
            parse_features(&json!({ "features": "0.1,0.2" })),
            Err(ValidationError::WrongLength { got: None })
        );
        assert_eq!(
            parse_features(&json!({ "features": vec![0.1; 59] })),
            Err(ValidationError::WrongLength { got: Some(59) })
        );
    }

    #[test]
    fn non_numeric_elements_are_rejected() {
        let mut values: Vec<Value> = vec![json!(0.2); FEATURE_COUNT];
        values[5] = json!("abc");
        let err = parse_features(&json!({ "features": values })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotNumeric {
                index: 6,
                raw: "\"abc\"".to_string()
            }
        );

        values[5] = Value::Null;
        assert!(parse_features(&json!({ "features": values })).is_err());
        values[5] = json!("NaN");
        assert!(parse_features(&json!({ "features": values })).is_err());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut values: Vec<Value> = vec![json!(0.2); FEATURE_COUNT];
        values[0] = json!(" 0.75 ");
        let features = parse_features(&json!({ "features": values })).unwrap();
        assert_eq!(features[0], 0.75);
    }

    #[test]
    fn strict_flag_follows_truthiness() {
        for on in [json!(true), json!(1), json!(-2.5), json!("true"), json!("false"), json!([]), json!({})] {
            assert!(strict_requested(&json!({ "validateStrict": on })), "{on}");
        }
        for off in [json!(false), json!(0), json!(0.0), json!(""), Value::Null] {
            assert!(!strict_requested(&json!({ "validateStrict": off })), "{off}");
        }
        assert!(!strict_requested(&json!({})));
    }

    #[test]
    fn truthy_non_boolean_strict_flag_rejects_unknown_vectors() {
        let service = two_point_service();
        for flag in [json!(1), json!("true")] {
            let body = json!({ "features": vec![0.3; FEATURE_COUNT], "validateStrict": flag });
            let response = handle_predict(&service, &body);
            assert_eq!(response.status, 400, "validateStrict={flag}");
            assert_eq!(response.body["isFromDataset"], false);
        }
        assert_eq!(service.training_runs(), 0);
    }

    #[test]
    fn legacy_nan_training_yields_null_confidence() {
        let text = format!(
            "{}\n{}\n",
            row(0.5, "M").replacen("0.5", "x", 1),
            row(0.1, "R")
        );
        let service = PredictionService::new(
            TextSource::inline("train", text.clone()),
            TextSource::inline("samples", text),
            MalformedPolicy::KeepNan,
        );
        let response = handle_predict(&service, &json!({ "features": vec![0.1; FEATURE_COUNT] }));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["result"], "Rock");
        assert_eq!(response.body["isFromDataset"], true);
        assert!(response.body["confidence"].is_null());
        let model = service.model().unwrap();
        assert!(model.bias.is_nan());
    }

    #[test]
    fn confidence_is_rounded() {
        assert_eq!(round2(0.98765), 0.99);
        assert_eq!(round2(0.5), 0.5);
        assert_eq!(round2(0.994), 0.99);
    }

    #[test]
    fn strict_rejection_does_not_train() {
        let service = two_point_service();
        let body = json!({ "features": vec![0.3; FEATURE_COUNT], "validateStrict": true });
        let err = run_predict(&service, &body).unwrap_err();
        assert_eq!(err, ApiError::BadRequest(ValidationError::NotFromDataset));
        assert!(service.model().is_none());
        assert_eq!(service.training_runs(), 0);
    }

    #[test]
    fn range_failure_does_not_load_anything() {
        let service = two_point_service();
        let mut values = vec![0.5; FEATURE_COUNT];
        values[0] = -0.1;
        let err = run_predict(&service, &json!({ "features": values })).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(service.model().is_none());
    }

    #[test]
    fn response_omits_warning_for_members() {
        let service = two_point_service();
        let response = handle_predict(&service, &json!({ "features": vec![0.5; FEATURE_COUNT] }));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["result"], "Mine");
        assert_eq!(response.body["rawClass"], "M");
        assert_eq!(response.body["isFromDataset"], true);
        assert!(response.body.get("warning").is_none());
    }
}
