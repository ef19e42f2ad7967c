//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fraudscan_core::{Error, PredictionRequest, PredictionResponse};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::state::AppState;

pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/models", get(list_models))
        .route("/predict", post(predict))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy for the given origins, with credentials and any method or header
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Job Fraud Classifier API is running.",
    }))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    default_model: String,
    available: Vec<String>,
    loaded: Vec<String>,
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let cache = state.service.cache();
    Json(ModelsResponse {
        default_model: state.service.default_model().to_string(),
        available: cache.available_models(),
        loaded: cache.loaded_models().await,
    })
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(req) = payload?;
    debug!(
        model = req.model_label.as_deref().unwrap_or(state.service.default_model()),
        chars = req.input_len(),
        "Received prediction request"
    );

    let response = state.service.predict(&req).await?;
    Ok(Json(response))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// Request or prediction failure rendered as `{"detail": ...}`
#[derive(Debug)]
pub enum AppError {
    /// The body was not a JSON prediction request
    Rejected(JsonRejection),
    Prediction(Error),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Prediction(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Rejected(rejection) => {
                debug!(status = %rejection.status(), "Rejected prediction body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            }
            AppError::Prediction(err) if err.is_client_error() => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Prediction(err) => {
                error!(kind = err.kind(), "Prediction failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
