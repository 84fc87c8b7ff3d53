use super::auth::owner_header;
use super::error::ApiError;
use super::state::AppState;
use crate::error::OrchestratorError;
use crate::orchestrator::views::{CancelRequest, CreateJobRequest, DequeueRequest, FailedRequest, SucceededRequest};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    if request.owner_id != owner_id {
        return Err(ApiError(OrchestratorError::forbidden("ownerId does not match x-owner-id")));
    }
    let result = state.orchestrator.create_optimization_job(request)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<i64>,
}

pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let jobs = state.orchestrator.list_jobs(&owner_id, query.limit.unwrap_or(0));
    Ok(Json(jobs))
}

pub async fn get_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let snapshot = state.orchestrator.get_job_snapshot(&job_id, &owner_id)?;
    Ok(Json(snapshot))
}

pub async fn get_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let status = state.orchestrator.get_job_status(&job_id, &owner_id)?;
    Ok(Json(status))
}

pub async fn cancel_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let request: CancelRequest = parse_optional_body(&body)?;
    let status = state.orchestrator.cancel_job(&job_id, &owner_id, request.reason)?;
    Ok(Json(status))
}

pub async fn export_bundle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let bundle = state.orchestrator.export_top_n_bundle(&job_id, &owner_id)?;
    Ok(Json(bundle))
}

pub async fn dequeue(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    let request: DequeueRequest = parse_optional_body(&body)?;
    let task = state.orchestrator.dequeue_next(&owner_id, request.job_id.as_deref())?;
    Ok(Json(task))
}

pub async fn report_succeeded(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((job_id, task_id)): Path<(String, String)>,
    Json(request): Json<SucceededRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    state.orchestrator.get_job_status(&job_id, &owner_id)?;
    let task = state
        .orchestrator
        .mark_task_succeeded(&job_id, &task_id, request.score, request.result_summary_id)?;
    Ok(Json(task))
}

pub async fn report_failed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((job_id, task_id)): Path<(String, String)>,
    Json(request): Json<FailedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_header(&headers)?;
    state.orchestrator.get_job_status(&job_id, &owner_id)?;
    let task = state
        .orchestrator
        .mark_task_failed(&job_id, &task_id, request.error_type, request.message)?;
    Ok(Json(task))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "service": "optimization-orchestrator",
        "status": "ok",
        "details": {},
        "ts": Utc::now(),
    }))
}

fn parse_optional_body<T: for<'de> Deserialize<'de> + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Ok(T::default());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError(OrchestratorError::param_invalid(format!("invalid JSON body: {e}"))))?;
    serde_json::from_value(value)
        .map_err(|e| ApiError(OrchestratorError::param_invalid(format!("invalid request body: {e}"))))
}
