//! Smoke test: run sample postings through every registered model

use fraudscan_classifiers::PredictionService;
use fraudscan_core::{PredictionRequest, PredictionResponse};
use std::fmt::Write as _;
use tracing::warn;

/// Sample postings, one legitimate and one fraudulent
pub const SAMPLES: &[(&str, &str)] = &[
    (
        "real",
        "We are seeking an experienced Software Engineer to join our growing platform team. \
         You will design and maintain backend services in collaboration with product managers. \
         Competitive salary, health insurance and a 401k match are offered.",
    ),
    (
        "fake",
        "Earn $5000/week working from home!!! No experience needed. Just pay a small registration \
         fee and start today. Limited spots, reply with your bank details to get started!",
    ),
];

/// Outcome of one sample against one model
#[derive(Debug)]
pub struct SmokeOutcome {
    pub model: String,
    pub sample: &'static str,
    pub result: Result<PredictionResponse, String>,
}

/// Run every sample through every registered model; failing models are reported, not fatal
pub async fn run(service: &PredictionService) -> Vec<SmokeOutcome> {
    let mut outcomes = Vec::new();

    for model in service.cache().available_models() {
        for &(sample, text) in SAMPLES {
            let request = PredictionRequest::new(text).with_model(model.clone());
            let result = service.predict(&request).await.map_err(|e| {
                warn!(model = %model, "Smoke test failed: {}", e);
                e.to_string()
            });
            outcomes.push(SmokeOutcome {
                model: model.clone(),
                sample,
                result,
            });
        }
    }

    outcomes
}

/// Render outcomes as a plain-text table
pub fn render(outcomes: &[SmokeOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<6} {:<24} {:>10} {:>10} {:>10}",
        "model", "sample", "label", "confidence", "p(real)", "p(fake)"
    );

    for outcome in outcomes {
        match &outcome.result {
            Ok(response) => {
                let _ = writeln!(
                    out,
                    "{:<14} {:<6} {:<24} {:>10.4} {:>10.4} {:>10.4}",
                    outcome.model,
                    outcome.sample,
                    response.prediction_label,
                    response.confidence_score,
                    response.probabilities.non_fraudulent,
                    response.probabilities.fraudulent
                );
            }
            Err(message) => {
                let _ = writeln!(out, "{:<14} {:<6} ERROR: {}", outcome.model, outcome.sample, message);
            }
        }
    }

    out
}
