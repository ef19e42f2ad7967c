//! Request orchestration: resolve, normalize, transform, predict

use crate::cache::ArtifactCache;
use crate::normalizer::TextNormalizer;
use fraudscan_core::{
    class_label, ClassProbabilities, Error, PredictionRequest, PredictionResponse, Result, FRAUDULENT,
    LEGITIMATE,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Serves predictions from cached artifacts
#[derive(Clone)]
pub struct PredictionService {
    normalizer: Arc<TextNormalizer>,
    cache: Arc<ArtifactCache>,
    default_model: String,
}

impl PredictionService {
    pub fn new(normalizer: Arc<TextNormalizer>, cache: Arc<ArtifactCache>, default_model: impl Into<String>) -> Self {
        Self {
            normalizer,
            cache,
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn cache(&self) -> &Arc<ArtifactCache> {
        &self.cache
    }

    /// Classify one job description
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let started = Instant::now();
        metrics::counter!("fraudscan_requests_total").increment(1);

        let result = self.run(request).await;
        match &result {
            Ok(response) => {
                metrics::histogram!("fraudscan_prediction_latency_us")
                    .record(started.elapsed().as_micros() as f64);
                debug!(
                    model = %response.model_used,
                    code = response.prediction_code,
                    confidence = response.confidence_score,
                    "Prediction served"
                );
            }
            Err(e) => {
                metrics::counter!("fraudscan_errors_total", "kind" => e.kind()).increment(1);
            }
        }
        result
    }

    async fn run(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let identifier = request.model_label.as_deref().unwrap_or(&self.default_model);
        let model = self.cache.resolve(identifier).await?;

        let cleaned = self.normalizer.normalize(request.job_description.as_deref());
        let features = model.transformer.transform(&cleaned)?;
        let code = model.classifier.predict(&features)?;
        let probabilities = model.classifier.predict_proba(&features)?;
        check_probabilities(identifier, &probabilities)?;

        let confidence = probabilities
            .get(code)
            .copied()
            .ok_or_else(|| Error::inference(format!("model '{}' predicted unknown class {}", identifier, code)))?;
        if confidence < 0.5 {
            metrics::counter!("fraudscan_low_confidence_total").increment(1);
            warn!(model = identifier, code, confidence, "Prediction below 0.5 confidence");
        }

        Ok(PredictionResponse {
            prediction_label: class_label(code).to_string(),
            prediction_code: code,
            confidence_score: confidence,
            probabilities: ClassProbabilities {
                non_fraudulent: probabilities[LEGITIMATE],
                fraudulent: probabilities[FRAUDULENT],
            },
            input_text_length: request.input_len(),
            cleaned_text_length: cleaned.chars().count(),
            model_used: identifier.to_string(),
        })
    }
}

/// A binary model must return two finite probabilities that sum to one
fn check_probabilities(identifier: &str, probabilities: &[f64]) -> Result<()> {
    if probabilities.len() != 2 {
        return Err(Error::inference(format!(
            "model '{}' returned {} class probabilities, expected 2",
            identifier,
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
        return Err(Error::inference(format!(
            "model '{}' returned probabilities outside [0, 1]: {:?}",
            identifier, probabilities
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::inference(format!(
            "model '{}' returned probabilities summing to {}",
            identifier, total
        )));
    }
    Ok(())
}
