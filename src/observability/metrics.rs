//! Metric counters/gauges, gated by `OBS_METRICS_ENABLED`.

use crate::config::AppConfig;
use crate::models::{OptimizationJob, StopReason};

pub fn throttled_requests(config: &AppConfig, job_id: &str, owner_id: &str) {
    if !config.obs_metrics_enabled {
        return;
    }
    metrics::counter!("throttled_requests", "jobId" => job_id.to_string(), "ownerId" => owner_id.to_string())
        .increment(1);
}

pub fn queue_wait_seconds(config: &AppConfig, seconds: f64) {
    if !config.obs_metrics_enabled {
        return;
    }
    metrics::histogram!("queue_wait_seconds").record(seconds);
}

pub fn job_exec_seconds(config: &AppConfig, job_id: &str, seconds: f64) {
    if !config.obs_metrics_enabled {
        return;
    }
    metrics::histogram!("job_exec_seconds", "jobId" => job_id.to_string()).record(seconds);
}

pub fn job_retry_total(config: &AppConfig, job_id: &str, retries: u32) {
    if !config.obs_metrics_enabled {
        return;
    }
    let _ = retries;
    metrics::counter!("job_retry_total", "jobId" => job_id.to_string()).increment(1);
}

pub fn active_jobs(config: &AppConfig, count: usize) {
    if !config.obs_metrics_enabled {
        return;
    }
    metrics::gauge!("active_jobs").set(count as f64);
}

/// `job_stop_total=1` tagged `{jobId, ownerId, status, stopKind}`, plus
/// `job_stop_threshold`/`job_stop_score` when the reason carries them.
pub fn job_stop(config: &AppConfig, job: &OptimizationJob, reason: &StopReason) {
    if !config.obs_metrics_enabled {
        return;
    }
    metrics::counter!(
        "job_stop_total",
        "jobId" => job.id.clone(),
        "ownerId" => job.owner_id.clone(),
        "status" => job.status.as_str(),
        "stopKind" => reason.kind()
    )
    .increment(1);

    if let StopReason::EarlyStopThreshold { threshold, score, .. } = reason {
        metrics::gauge!("job_stop_threshold", "jobId" => job.id.clone()).set(*threshold);
        metrics::gauge!("job_stop_score", "jobId" => job.id.clone()).set(*score);
    }
}
