//! Inclusive numeric range expansion for `{start, end, step}` dimensions.

use crate::constants::{MAX_RANGE_VALUES, RANGE_ROUND_DECIMALS};
use crate::error::OrchestratorError;

fn round_12(value: f64) -> f64 {
    let factor = 10f64.powi(RANGE_ROUND_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Enumerate `start, start±step, …` inclusive of `end` when numerically
/// reachable, rounding each value to tame float drift.
pub fn expand_range(
    key: &str,
    start: f64,
    end: f64,
    step: f64,
) -> Result<Vec<f64>, OrchestratorError> {
    if step <= 0.0 {
        return Err(OrchestratorError::param_invalid(format!(
            "paramSpace.{key} step must be > 0"
        )));
    }
    let ascending = end >= start;
    let mut values = Vec::new();
    let mut current = start;
    let mut iterations: u64 = 0;
    loop {
        let reached_end = if ascending { current <= end } else { current >= end };
        if !reached_end || iterations >= MAX_RANGE_VALUES {
            break;
        }
        values.push(round_12(current));
        current = if ascending { current + step } else { current - step };
        iterations += 1;
    }
    if iterations >= MAX_RANGE_VALUES {
        return Err(OrchestratorError::param_invalid(format!(
            "paramSpace.{key} range produced too many values"
        )));
    }
    if values.is_empty() {
        return Err(OrchestratorError::param_invalid(format!(
            "paramSpace.{key} range produced no values"
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_inclusive() {
        let values = expand_range("x", 0.0, 1.0, 0.25).unwrap();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn descending_inclusive() {
        let values = expand_range("x", 1.0, 0.0, 0.5).unwrap();
        assert_eq!(values, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(expand_range("x", 0.0, 1.0, 0.0).is_err());
        assert!(expand_range("x", 0.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn rounds_float_drift() {
        let values = expand_range("x", 0.1, 0.3, 0.1).unwrap();
        assert_eq!(values, vec![0.1, 0.2, 0.3]);
    }
}
