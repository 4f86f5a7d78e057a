use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::generator::GenerationOutcome;
use crate::models::TextSegment;
use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        nlp_models_used: state.engine.models_used().to_string(),
        messaging_enabled: state.generator.is_some(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub nlp_models_used: String,
    pub messaging_enabled: bool,
}

/// Run one raw payload through the same classification the worker
/// applies, returning the routing tag alongside the outbound payload.
pub async fn enrich_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EnrichResponse>> {
    let message = state.processor.process(&body);
    let result = serde_json::from_slice(&message.payload)?;

    Ok(Json(EnrichResponse {
        tag: message.tag,
        result,
    }))
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub tag: &'static str,
    pub result: serde_json::Value,
}

/// Enrich a bare text string, bypassing the event envelope
pub async fn enrich_text(
    State(state): State<AppState>,
    Json(request): Json<EnrichTextRequest>,
) -> Result<Json<Vec<TextSegment>>> {
    request.validate()?;
    Ok(Json(state.engine.enrich(&request.text)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnrichTextRequest {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Publish synthetic test events to the input subject
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerationOutcome>> {
    request.validate()?;

    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::Configuration("test-data generator requires messaging to be enabled".to_string())
    })?;

    if request.count > state.generator_config.max_count {
        return Err(AppError::InvalidInput(format!(
            "count {} exceeds maximum {}",
            request.count, state.generator_config.max_count
        )));
    }

    let rate = request
        .rate_per_second
        .unwrap_or(state.generator_config.default_rate_per_second);

    let outcome = generator.generate(request.count, rate).await;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(range(min = 1))]
    pub count: usize,

    /// Events per second; defaults from configuration
    #[validate(range(min = 0.001))]
    pub rate_per_second: Option<f64>,
}
