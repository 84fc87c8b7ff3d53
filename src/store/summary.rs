//! Summary refresh: recompute counts, Top-N, and derived job status.
//!
//! Pure functions over `&mut OptimizationJob` / task tables — no locking,
//! no I/O. Callers (the orchestrator) already hold the store lock and are
//! responsible for persistence write-through after a change is detected.

use crate::models::{EarlyStopPolicy, OptimizationJob, OptimizationTask, OptimizationSummary, StopMode, TopNEntry};
use crate::models::status::Status;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Recompute `finished`/`running`/`throttled`/`topN` and the job's derived
/// status. Returns `true` if anything observable changed (summary or
/// status), in which case the caller should bump `updated_at` and persist.
pub fn refresh(
    job: &mut OptimizationJob,
    tasks: &IndexMap<String, OptimizationTask>,
    result_scores: &HashMap<String, f64>,
    top_n_limit: usize,
    now: DateTime<Utc>,
) -> bool {
    let total = tasks.len();
    let mut finished = 0usize;
    let mut running = 0usize;
    let mut throttled = 0usize;
    let mut any_failed = false;

    for task in tasks.values() {
        if task.status.is_terminal() {
            finished += 1;
            if task.status == Status::Failed {
                any_failed = true;
            }
        }
        if task.status == Status::Running {
            running += 1;
        }
        if task.status == Status::Queued && task.throttled {
            throttled += 1;
        }
    }

    let top_n = build_top_n(tasks, result_scores, job.early_stop_policy.as_ref(), top_n_limit);

    let new_status = if let Some(locked) = job.locked_status {
        locked
    } else if total > 0 && finished >= total {
        if any_failed {
            Status::Failed
        } else {
            Status::Succeeded
        }
    } else if running > 0 {
        Status::Running
    } else {
        Status::Queued
    };

    let new_summary = OptimizationSummary {
        total,
        finished,
        running,
        throttled,
        top_n,
    };

    let changed = new_summary != job.summary || new_status != job.status;
    job.summary = new_summary;
    job.total_tasks = total;
    job.status = new_status;
    if changed {
        job.updated_at = now;
    }
    changed
}

fn build_top_n(
    tasks: &IndexMap<String, OptimizationTask>,
    result_scores: &HashMap<String, f64>,
    policy: Option<&EarlyStopPolicy>,
    top_n_limit: usize,
) -> Vec<TopNEntry> {
    let mut scored: Vec<(&str, f64, Option<String>)> = tasks
        .values()
        .filter(|t| t.status == Status::Succeeded)
        .filter_map(|t| {
            t.score.map(|score| {
                let resolved = t
                    .result_summary_id
                    .as_ref()
                    .and_then(|id| result_scores.get(id))
                    .copied()
                    .unwrap_or(score);
                (t.id.as_str(), resolved, t.result_summary_id.clone())
            })
        })
        .collect();

    let ascending = matches!(policy.map(|p| p.mode), Some(StopMode::Min));
    scored.sort_by(|a, b| {
        if ascending {
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
    scored.truncate(top_n_limit);

    scored
        .into_iter()
        .map(|(task_id, score, result_summary_id)| TopNEntry {
            task_id: task_id.to_string(),
            score,
            result_summary_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::ParamSet;

    fn job(policy: Option<EarlyStopPolicy>) -> OptimizationJob {
        let now = Utc::now();
        OptimizationJob {
            id: "job1".into(),
            owner_id: "owner1".into(),
            version_id: "v1".into(),
            param_space: serde_json::json!({}),
            concurrency_limit: 4,
            early_stop_policy: policy,
            status: Status::Queued,
            total_tasks: 0,
            estimate: 0,
            summary: OptimizationSummary::empty(0),
            locked_status: None,
            stop_reason: None,
            source_job_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(id: &str, status: Status, score: Option<f64>) -> OptimizationTask {
        let now = Utc::now();
        let mut t = OptimizationTask::new_queued(
            id.into(),
            "job1".into(),
            "owner1".into(),
            "v1".into(),
            ParamSet::new(),
            false,
            now,
        );
        t.status = status;
        t.score = score;
        t
    }

    #[test]
    fn top_n_min_mode_orders_ascending() {
        let mut job = job(Some(EarlyStopPolicy {
            metric: "sharpe".into(),
            threshold: 0.0,
            mode: StopMode::Min,
        }));
        let mut tasks = IndexMap::new();
        for (id, score) in [("t1", 0.42), ("t2", 0.18), ("t3", 0.36)] {
            tasks.insert(id.to_string(), task(id, Status::Succeeded, Some(score)));
        }
        refresh(&mut job, &tasks, &HashMap::new(), 5, Utc::now());
        let scores: Vec<f64> = job.summary.top_n.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![0.18, 0.36, 0.42]);
    }

    #[test]
    fn throttled_counts_only_queued_and_throttled() {
        let mut job = job(None);
        let mut tasks = IndexMap::new();
        let mut t1 = task("t1", Status::Running, None);
        t1.throttled = false;
        let mut t2 = task("t2", Status::Queued, None);
        t2.throttled = true;
        let mut t3 = task("t3", Status::Queued, None);
        t3.throttled = true;
        let mut t4 = task("t4", Status::Running, None);
        t4.throttled = false;
        for t in [t1, t2, t3, t4] {
            tasks.insert(t.id.clone(), t);
        }
        refresh(&mut job, &tasks, &HashMap::new(), 5, Utc::now());
        assert_eq!(job.summary.running, 2);
        assert_eq!(job.summary.throttled, 2);
    }

    #[test]
    fn status_becomes_failed_when_any_task_failed() {
        let mut job = job(None);
        let mut tasks = IndexMap::new();
        tasks.insert("t1".into(), task("t1", Status::Failed, None));
        tasks.insert("t2".into(), task("t2", Status::Succeeded, Some(1.0)));
        refresh(&mut job, &tasks, &HashMap::new(), 5, Utc::now());
        assert_eq!(job.status, Status::Failed);
        assert_eq!(job.summary.finished, 2);
    }
}
