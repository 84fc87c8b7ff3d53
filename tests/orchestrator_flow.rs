use optimization_orchestrator::config::AppConfig;
use optimization_orchestrator::error::ErrorCode;
use optimization_orchestrator::models::{EarlyStopPolicy, Status, StopMode, TaskErrorType};
use optimization_orchestrator::orchestrator::views::CreateJobRequest;
use optimization_orchestrator::orchestrator::Orchestrator;
use serde_json::json;

fn test_config() -> AppConfig {
    AppConfig {
        obs_enabled: false,
        obs_metrics_enabled: false,
        ..AppConfig::default()
    }
}

fn create_request(param_space: serde_json::Value, concurrency_limit: u32) -> CreateJobRequest {
    CreateJobRequest {
        owner_id: "owner-1".to_string(),
        version_id: "v1".to_string(),
        param_space,
        concurrency_limit,
        early_stop_policy: None,
        estimate: None,
        source_job_id: None,
    }
}

#[test]
fn throttled_dispatch_respects_concurrency_limit() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let result = orch
        .create_optimization_job(create_request(json!({"x": [1, 2, 3, 4]}), 2))
        .unwrap();
    assert_eq!(result.total_tasks, 4);
    assert!(result.throttled);

    let status = orch.get_job_status(&result.id, "owner-1").unwrap();
    assert_eq!(status.diagnostics.queue_depth, 2);

    let t1 = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
    let _t2 = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
    assert!(orch.dequeue_next("owner-1", Some(&result.id)).unwrap().is_none());

    // Freeing a running slot activates one of the throttled tasks.
    orch.mark_task_succeeded(&result.id, &t1.id, Some(1.0), None).unwrap();
    assert!(orch.dequeue_next("owner-1", Some(&result.id)).unwrap().is_some());
}

#[test]
fn retry_backoff_grows_exponentially() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let result = orch
        .create_optimization_job(create_request(json!({"x": [1]}), 1))
        .unwrap();
    let task = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
    let base = orch.config().retry_base_seconds as i64;

    let after1 = orch
        .mark_task_failed(&result.id, &task.id, TaskErrorType::UpstreamError, "boom".into())
        .unwrap();
    assert_eq!(after1.retries, 1);
    assert_eq!((after1.next_run_at - after1.updated_at).num_seconds(), base);
    assert_eq!(after1.status, Status::Queued);

    let after2 = orch
        .mark_task_failed(&result.id, &task.id, TaskErrorType::UpstreamError, "boom again".into())
        .unwrap();
    assert_eq!(after2.retries, 2);
    assert_eq!((after2.next_run_at - after2.updated_at).num_seconds(), base * 2);

    let after3 = orch
        .mark_task_failed(&result.id, &task.id, TaskErrorType::UpstreamError, "boom thrice".into())
        .unwrap();
    assert_eq!(after3.retries, 3);
    assert_eq!((after3.next_run_at - after3.updated_at).num_seconds(), base * 4);
}

#[test]
fn param_error_fails_immediately_without_retry() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let result = orch
        .create_optimization_job(create_request(json!({"x": [1]}), 1))
        .unwrap();
    let task = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();

    let after = orch
        .mark_task_failed(&result.id, &task.id, TaskErrorType::ParamError, "bad param".into())
        .unwrap();
    assert_eq!(after.status, Status::Failed);
    assert_eq!(after.retries, 0);

    let status = orch.get_job_status(&result.id, "owner-1").unwrap();
    assert_eq!(status.status, "failed");
}

#[test]
fn top_n_orders_ascending_under_min_mode_policy() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let mut request = create_request(json!({"x": [1, 2, 3]}), 3);
    request.early_stop_policy = Some(EarlyStopPolicy {
        metric: "drawdown".to_string(),
        threshold: -100.0,
        mode: StopMode::Min,
    });
    let result = orch.create_optimization_job(request).unwrap();

    for score in [5.0, 1.0, 3.0] {
        let task = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
        orch.mark_task_succeeded(&result.id, &task.id, Some(score), None).unwrap();
    }

    let status = orch.get_job_status(&result.id, "owner-1").unwrap();
    let ordered: Vec<f64> = status.summary.top_n.iter().map(|e| e.score).collect();
    assert_eq!(ordered, vec![1.0, 3.0, 5.0]);
    assert_eq!(status.status, "succeeded");
}

#[test]
fn early_stop_locks_job_and_blocks_further_dispatch() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let mut request = create_request(json!({"x": [1, 2, 3]}), 3);
    request.early_stop_policy = Some(EarlyStopPolicy {
        metric: "sharpe".to_string(),
        threshold: 2.0,
        mode: StopMode::Max,
    });
    let result = orch.create_optimization_job(request).unwrap();

    let task = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
    let after = orch.mark_task_succeeded(&result.id, &task.id, Some(2.5), None).unwrap();
    // The triggering task itself is already terminal and keeps its own status.
    assert_eq!(after.status, Status::Succeeded);

    let status = orch.get_job_status(&result.id, "owner-1").unwrap();
    assert_eq!(status.status, "early-stopped");
    assert_eq!(status.diagnostics.is_final, Some(true));

    assert!(orch.dequeue_next("owner-1", Some(&result.id)).unwrap().is_none());
}

#[test]
fn cancel_locks_running_job_and_is_idempotent() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let result = orch
        .create_optimization_job(create_request(json!({"x": [1, 2]}), 2))
        .unwrap();
    let running = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();

    let status = orch
        .cancel_job(&result.id, "owner-1", Some("operator abort".to_string()))
        .unwrap();
    assert_eq!(status.status, "canceled");
    assert_eq!(status.diagnostics.is_final, Some(true));

    let status_again = orch
        .cancel_job(&result.id, "owner-1", Some("ignored second reason".to_string()))
        .unwrap();
    assert_eq!(status_again.status, "canceled");

    assert!(orch.dequeue_next("owner-1", Some(&result.id)).unwrap().is_none());

    let unchanged = orch
        .mark_task_succeeded(&result.id, &running.id, Some(9.0), None)
        .unwrap();
    assert_eq!(unchanged.status, Status::Canceled);
}

#[test]
fn owner_mismatch_is_forbidden() {
    let orch = Orchestrator::new(test_config()).unwrap();
    let result = orch
        .create_optimization_job(create_request(json!({"x": [1]}), 1))
        .unwrap();
    let err = orch.get_job_status(&result.id, "someone-else").unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[test]
fn persistence_round_trip_hydrates_equivalent_state() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = format!("sqlite://{}", dir.path().join("orchestrator.sqlite3").display());

    let orch = Orchestrator::new(test_config()).unwrap();
    orch.configure_persistence(Some(dsn.clone())).unwrap();

    let result = orch
        .create_optimization_job(create_request(json!({"x": [1, 2, 3]}), 2))
        .unwrap();
    let task = orch.dequeue_next("owner-1", Some(&result.id)).unwrap().unwrap();
    orch.mark_task_succeeded(&result.id, &task.id, Some(4.2), None).unwrap();
    let before = orch.get_job_status(&result.id, "owner-1").unwrap();

    let hydrated = Orchestrator::new(test_config()).unwrap();
    hydrated.configure_persistence(Some(dsn)).unwrap();
    let after = hydrated.get_job_status(&result.id, "owner-1").unwrap();

    assert_eq!(after.total_tasks, before.total_tasks);
    assert_eq!(after.summary.finished, before.summary.finished);
    assert_eq!(after.summary.running, before.summary.running);
    assert_eq!(after.summary.top_n, before.summary.top_n);
}
