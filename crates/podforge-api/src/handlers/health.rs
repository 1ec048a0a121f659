//! Health and model listing handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use podforge_worker::{model_base, WorkerError};

use crate::error::ApiResult;
use crate::state::AppState;

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub time: String,
    pub model: String,
    pub ollama_url: String,
    pub ollama_connection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /health
///
/// Reports whether the model-serving dependency is reachable and whether
/// the configured model is available. Degraded states still answer 200:
/// this is an operational signal, not part of the job state machine.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        time: Utc::now().to_rfc3339(),
        model: state.model.clone(),
        ollama_url: state.ollama.base_url().to_string(),
        ollama_connection: "ok".to_string(),
        available_models: None,
        message: None,
    };

    match state.ollama.list_models().await {
        Ok(models) => {
            let configured = model_base(&state.model);
            if !models.iter().any(|m| model_base(m) == configured) {
                response.status = "degraded".to_string();
                response.message = Some(format!(
                    "Configured model '{}' not found in available Ollama models",
                    state.model
                ));
            }
            response.available_models = Some(models);
        }
        Err(err) => {
            response.status = "degraded".to_string();
            response.ollama_connection = match &err {
                WorkerError::Http(e) if e.is_status() => "failed",
                _ => "error",
            }
            .to_string();
            response.message = Some(format!(
                "Failed to connect to Ollama at {}: {err}",
                state.ollama.base_url()
            ));
        }
    }

    Json(response)
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub current_model: String,
}

/// GET /api/models
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<ModelsResponse>> {
    let models = state.ollama.list_models().await?;

    Ok(Json(ModelsResponse {
        models,
        current_model: state.model.clone(),
    }))
}
