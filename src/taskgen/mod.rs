//! Task generator: materializes the Cartesian product of a normalized
//! param space into a capped, throttle-classified task list.

use crate::constants::MAX_TASK_CAP;
use crate::models::task::{OptimizationTask, ParamSet};
use crate::paramspace::normalize::NormalizedSpace;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate tasks in lexicographic key order (keys in `normalized`'s
/// insertion order, values in each dimension's input order), capped at
/// [`MAX_TASK_CAP`] regardless of the computed estimate.
pub fn generate_tasks(
    normalized: &NormalizedSpace,
    job_id: &str,
    owner_id: &str,
    version_id: &str,
    concurrency_limit: u32,
    now: DateTime<Utc>,
) -> Vec<OptimizationTask> {
    let keys: Vec<&String> = normalized.keys().collect();
    let mut tasks = Vec::new();
    let mut index: usize = 0;

    cartesian_product(normalized, &keys, &mut ParamSet::new(), &mut |params| {
        if index >= MAX_TASK_CAP {
            return false;
        }
        let throttled = index as u32 >= concurrency_limit;
        tasks.push(OptimizationTask::new_queued(
            Uuid::new_v4().to_string(),
            job_id.to_string(),
            owner_id.to_string(),
            version_id.to_string(),
            params.clone(),
            throttled,
            now,
        ));
        index += 1;
        true
    });

    tasks
}

/// Depth-first Cartesian product walk over `keys` in order; `visit` returns
/// `false` to signal the caller has reached its cap and the walk should stop.
fn cartesian_product(
    normalized: &NormalizedSpace,
    keys: &[&String],
    current: &mut ParamSet,
    visit: &mut dyn FnMut(&ParamSet) -> bool,
) -> bool {
    let Some((key, rest)) = keys.split_first() else {
        return visit(current);
    };
    for value in &normalized[*key] {
        current.insert((*key).clone(), value.clone());
        let keep_going = cartesian_product(normalized, rest, current, visit);
        current.shift_remove(*key);
        if !keep_going {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paramspace::normalize::normalize_param_space;
    use serde_json::json;

    #[test]
    fn throttles_beyond_concurrency_limit() {
        let (normalized, _) = normalize_param_space(&json!({"x": [1, 2, 3, 4]}), 500).unwrap();
        let tasks = generate_tasks(&normalized, "job1", "owner1", "v1", 2, Utc::now());
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks.iter().filter(|t| t.throttled).count(), 2);
        assert!(!tasks[0].throttled);
        assert!(!tasks[1].throttled);
        assert!(tasks[2].throttled);
        assert!(tasks[3].throttled);
    }

    #[test]
    fn caps_at_max_task_cap() {
        let (normalized, _) =
            normalize_param_space(&json!({"x": (0..1500).collect::<Vec<_>>()}), 2000).unwrap();
        let tasks = generate_tasks(&normalized, "job1", "owner1", "v1", 2, Utc::now());
        assert_eq!(tasks.len(), MAX_TASK_CAP);
    }

    #[test]
    fn lexicographic_key_order() {
        let (normalized, _) =
            normalize_param_space(&json!({"a": [1, 2], "b": ["x", "y"]}), 500).unwrap();
        let tasks = generate_tasks(&normalized, "job1", "owner1", "v1", 4, Utc::now());
        let combos: Vec<(i64, String)> = tasks
            .iter()
            .map(|t| {
                (
                    t.params["a"].as_i64().unwrap(),
                    t.params["b"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            combos,
            vec![
                (1, "x".to_string()),
                (1, "y".to_string()),
                (2, "x".to_string()),
                (2, "y".to_string()),
            ]
        );
    }
}
