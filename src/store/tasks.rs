//! Task-table helpers: slot activation and ready-task selection.
//!
//! Pure functions over a job's task table — no locking, no I/O.

use crate::models::status::Status;
use crate::models::OptimizationTask;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Promote throttled tasks back to ready, in insertion order, until the
/// job's concurrency slots are full or no throttled tasks remain.
pub fn activate_slots(
    tasks: &mut IndexMap<String, OptimizationTask>,
    concurrency_limit: u32,
    now: DateTime<Utc>,
) {
    let running = tasks.values().filter(|t| t.status == Status::Running).count() as u32;
    let ready_queued = tasks
        .values()
        .filter(|t| t.status == Status::Queued && !t.throttled)
        .count() as u32;
    let mut capacity = concurrency_limit.saturating_sub(running + ready_queued);
    if capacity == 0 {
        return;
    }
    for task in tasks.values_mut() {
        if capacity == 0 {
            break;
        }
        if task.status == Status::Queued && task.throttled {
            task.throttled = false;
            if task.next_run_at > now {
                task.next_run_at = now;
            }
            task.updated_at = now;
            capacity -= 1;
        }
    }
}

/// First ready task (`queued`, not throttled, due), in insertion order.
pub fn first_ready<'a>(
    tasks: &'a mut IndexMap<String, OptimizationTask>,
    now: DateTime<Utc>,
) -> Option<&'a mut OptimizationTask> {
    tasks.values_mut().find(|t| t.is_ready(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::ParamSet;

    fn queued_task(id: &str, throttled: bool, now: DateTime<Utc>) -> OptimizationTask {
        OptimizationTask::new_queued(
            id.into(),
            "job1".into(),
            "owner1".into(),
            "v1".into(),
            ParamSet::new(),
            throttled,
            now,
        )
    }

    #[test]
    fn activates_in_insertion_order_until_capacity_exhausted() {
        let now = Utc::now();
        let mut tasks = IndexMap::new();
        for (i, id) in ["t1", "t2", "t3", "t4"].into_iter().enumerate() {
            tasks.insert(id.to_string(), queued_task(id, i >= 2, now));
        }
        activate_slots(&mut tasks, 3, now);
        assert!(!tasks["t1"].throttled);
        assert!(!tasks["t2"].throttled);
        assert!(!tasks["t3"].throttled);
        assert!(tasks["t4"].throttled);
    }

    #[test]
    fn no_capacity_when_running_fills_limit() {
        let now = Utc::now();
        let mut tasks = IndexMap::new();
        let mut running = queued_task("t1", false, now);
        running.status = Status::Running;
        tasks.insert("t1".into(), running);
        tasks.insert("t2".into(), queued_task("t2", true, now));
        activate_slots(&mut tasks, 1, now);
        assert!(tasks["t2"].throttled);
    }
}
