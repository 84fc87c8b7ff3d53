//! Convenience emitters mirroring the `log_enqueue`/`log_start`/`log_end`/
//! `log_error`/`log_stop` helpers of the phase-tagged logging contract.

use super::mask::mask;
use super::schema::{LogEvent, Phase};
use crate::config::AppConfig;
use crate::models::{Status, StopReason, TaskErrorType};

pub fn log_enqueue(config: &AppConfig, job_id: &str, owner_id: &str, total_tasks: usize) {
    if !config.obs_enabled {
        return;
    }
    let mut event = LogEvent::new("info", config.worker_component.clone(), "job enqueued");
    event.job_id = Some(job_id.to_string());
    event.owner_id = Some(mask(owner_id));
    event.phase = Some(Phase::Enqueue);
    event.extra = Some(serde_json::json!({ "totalTasks": total_tasks }));
    event.emit();
}

pub fn log_start(config: &AppConfig, job_id: &str, owner_id: &str, task_id: &str) {
    if !config.obs_enabled {
        return;
    }
    let mut event = LogEvent::new("info", config.worker_component.clone(), "task started");
    event.job_id = Some(job_id.to_string());
    event.owner_id = Some(mask(owner_id));
    event.phase = Some(Phase::Start);
    event.extra = Some(serde_json::json!({ "taskId": task_id }));
    event.emit();
}

pub fn log_end(config: &AppConfig, job_id: &str, owner_id: &str, task_id: &str, duration_ms: u64) {
    if !config.obs_enabled {
        return;
    }
    let mut event = LogEvent::new("info", config.worker_component.clone(), "task finished");
    event.job_id = Some(job_id.to_string());
    event.owner_id = Some(mask(owner_id));
    event.phase = Some(Phase::End);
    event.duration_ms = Some(duration_ms);
    event.extra = Some(serde_json::json!({ "taskId": task_id }));
    event.emit();
}

pub fn log_error(config: &AppConfig, job_id: &str, owner_id: &str, error_type: TaskErrorType, message: &str) {
    if !config.obs_enabled {
        return;
    }
    let mut event = LogEvent::new("error", config.worker_component.clone(), mask(message));
    event.job_id = Some(job_id.to_string());
    event.owner_id = Some(mask(owner_id));
    event.phase = Some(Phase::Error);
    event.code = Some(error_type.as_str().to_string());
    event.emit();
}

pub fn log_stop(config: &AppConfig, job_id: &str, owner_id: &str, status: Status, reason: &StopReason) {
    if !config.obs_enabled {
        return;
    }
    let mut event = LogEvent::new("info", config.worker_component.clone(), "job stopped");
    event.job_id = Some(job_id.to_string());
    event.owner_id = Some(mask(owner_id));
    event.phase = Some(Phase::Stop);
    event.code = Some(reason.kind().to_string());
    event.extra = Some(serde_json::json!({ "status": status.as_str(), "reason": reason }));
    event.emit();
}
