use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use optimization_orchestrator::config::AppConfig;
use optimization_orchestrator::http::build_router;
use optimization_orchestrator::orchestrator::Orchestrator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        obs_enabled: false,
        obs_metrics_enabled: false,
        ..AppConfig::default()
    }
}

fn router() -> axum::Router {
    let orchestrator = Arc::new(Orchestrator::new(test_config()).unwrap());
    build_router(orchestrator)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_check_does_not_require_owner_header() {
    let app = router();
    let request = Request::builder()
        .method("GET")
        .uri("/internal/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_job_requires_owner_header() {
    let app = router();
    let request = Request::builder()
        .method("POST")
        .uri("/internal/optimizations")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "ownerId": "owner-1",
                "versionId": "v1",
                "paramSpace": {"x": [1, 2]},
                "concurrencyLimit": 2,
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_job_and_fetch_status_round_trip() {
    let app = router();

    let create_request = Request::builder()
        .method("POST")
        .uri("/internal/optimizations")
        .header("content-type", "application/json")
        .header("x-owner-id", "owner-1")
        .body(Body::from(
            json!({
                "ownerId": "owner-1",
                "versionId": "v1",
                "paramSpace": {"x": [1, 2, 3]},
                "concurrencyLimit": 2,
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(create_request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["totalTasks"], 3);
    let job_id = created["id"].as_str().expect("job id").to_string();

    let status_request = Request::builder()
        .method("GET")
        .uri(format!("/internal/optimizations/{job_id}/status"))
        .header("x-owner-id", "owner-1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(status_request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["totalTasks"], 3);
    assert_eq!(status["status"], "queued");
}

#[tokio::test]
async fn cross_owner_access_is_forbidden() {
    let app = router();

    let create_request = Request::builder()
        .method("POST")
        .uri("/internal/optimizations")
        .header("content-type", "application/json")
        .header("x-owner-id", "owner-1")
        .body(Body::from(
            json!({
                "ownerId": "owner-1",
                "versionId": "v1",
                "paramSpace": {"x": [1]},
                "concurrencyLimit": 1,
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(create_request).await.expect("response");
    let created = body_json(response).await;
    let job_id = created["id"].as_str().expect("job id").to_string();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/internal/optimizations/{job_id}/status"))
        .header("x-owner-id", "owner-2")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn shared_secret_gate_rejects_missing_header() {
    let config = AppConfig {
        shared_secret: Some("s3cr3t".to_string()),
        ..test_config()
    };
    let orchestrator = Arc::new(Orchestrator::new(config).unwrap());
    let app = build_router(orchestrator);

    let request = Request::builder()
        .method("GET")
        .uri("/internal/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn shared_secret_gate_accepts_matching_header() {
    let config = AppConfig {
        shared_secret: Some("s3cr3t".to_string()),
        ..test_config()
    };
    let orchestrator = Arc::new(Orchestrator::new(config).unwrap());
    let app = build_router(orchestrator);

    let request = Request::builder()
        .method("GET")
        .uri("/internal/health")
        .header("x-opt-shared-secret", "s3cr3t")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
