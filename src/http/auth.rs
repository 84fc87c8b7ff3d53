use super::error::ApiError;
use super::state::AppState;
use crate::error::OrchestratorError;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

const SHARED_SECRET_HEADER: &str = "x-opt-shared-secret";
pub const OWNER_HEADER: &str = "x-owner-id";

/// Rejects requests with a missing/mismatched shared secret when one is
/// configured. A no-op when `shared_secret` is unset.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = &state.orchestrator.config().shared_secret {
        let provided = request
            .headers()
            .get(SHARED_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(ApiError(OrchestratorError::forbidden("missing or invalid shared secret")));
        }
    }
    Ok(next.run(request).await)
}

/// Every operation that identifies an owner requires this header; ownership
/// mismatches against a stored job are enforced separately by the
/// orchestrator's own owner check.
pub fn owner_header(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiError(OrchestratorError::forbidden("missing x-owner-id header")))
}
