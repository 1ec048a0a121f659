//! Podcast job handlers: submission, status polling, listing.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use podforge_models::{JobId, JobView};
use podforge_queue::Admission;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submission payload. Missing fields fall back to the model defaults.
#[derive(Debug, Deserialize)]
pub struct CreatePodcastRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CreatePodcastResponse {
    pub job_id: String,
    pub started_immediately: bool,
    pub message: String,
}

/// POST /api/podcasts
///
/// Submit a new podcast job. Runs immediately when the worker is idle,
/// otherwise waits in the FIFO queue. Malformed bodies are rejected and
/// never create a job.
pub async fn create_podcast(
    State(state): State<AppState>,
    payload: Result<Json<CreatePodcastRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatePodcastResponse>)> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    if let Some(hosts) = &request.hosts {
        if hosts.len() != 2 {
            return Err(ApiError::bad_request("hosts must contain exactly two names"));
        }
        if hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(ApiError::bad_request("host names must not be empty"));
        }
    }

    let (job, admission) = state.executor.submit(request.topic, request.hosts)?;
    let started = admission == Admission::Started;
    info!(job_id = %job.id(), started, "podcast job submitted");

    Ok((
        StatusCode::CREATED,
        Json(CreatePodcastResponse {
            job_id: job.id().to_string(),
            started_immediately: started,
            message: if started {
                "Podcast creation started"
            } else {
                "Podcast added to queue"
            }
            .to_string(),
        }),
    ))
}

/// GET /api/podcasts/:job_id
pub async fn get_podcast(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let id = JobId::from_string(job_id);
    let job = state
        .registry
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Podcast not found"))?;
    Ok(Json(job.view()))
}

#[derive(Debug, Serialize)]
pub struct PodcastListResponse {
    pub podcasts: Vec<JobView>,
    pub current_job_id: Option<String>,
    pub queue_length: usize,
}

/// GET /api/podcasts
pub async fn list_podcasts(State(state): State<AppState>) -> Json<PodcastListResponse> {
    let podcasts = state.registry.list_all().iter().map(|job| job.view()).collect();
    Json(PodcastListResponse {
        podcasts,
        current_job_id: state.scheduler.current_job_id().map(|id| id.to_string()),
        queue_length: state.scheduler.queue_len(),
    })
}
