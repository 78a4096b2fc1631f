use rand::Rng;

use crate::data::sampler::PickedSample;
use crate::error::SampleError;
use crate::state::PredictionService;

use super::{respond, ApiError, ApiResponse};

pub fn run_sample<R: Rng + ?Sized>(service: &PredictionService, rng: &mut R) -> Result<PickedSample, ApiError> {
    service.sample(rng).map_err(|err| match err {
        SampleError::NoSamples => ApiError::NotFound(err.to_string()),
        SampleError::Load(cause) => ApiError::internal("Failed to load sample", cause),
    })
}

pub fn handle_sample<R: Rng + ?Sized>(service: &PredictionService, rng: &mut R) -> ApiResponse {
    respond(run_sample(service, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{MalformedPolicy, TextSource};
    use crate::data::model::FEATURE_COUNT;
    use crate::testing::row;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service_with_samples(samples: TextSource) -> PredictionService {
        PredictionService::new(
            TextSource::inline("train", row(0.5, "M")),
            samples,
            MalformedPolicy::Reject,
        )
    }

    #[test]
    fn returns_features_and_label_name() {
        let service = service_with_samples(TextSource::inline("samples", row(0.25, "M")));
        let response = handle_sample(&service, &mut StdRng::seed_from_u64(5));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["actualLabel"], "Mine");
        assert_eq!(response.body["features"].as_array().unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn empty_source_is_not_found() {
        let service = service_with_samples(TextSource::inline("samples", "\n"));
        let response = handle_sample(&service, &mut StdRng::seed_from_u64(5));
        assert_eq!(response.status, 404);
        assert_eq!(response.error_message(), Some("No samples available"));
    }

    #[test]
    fn unreadable_source_is_internal() {
        let service = service_with_samples(TextSource::file("/no/such/samples.txt"));
        let response = handle_sample(&service, &mut StdRng::seed_from_u64(5));
        assert_eq!(response.status, 500);
        assert_eq!(response.error_message(), Some("Failed to load sample"));
    }
}
