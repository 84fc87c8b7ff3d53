//! Param-space normalization: declarative `paramSpace` → enumerated lists.

use super::range::expand_range;
use crate::error::OrchestratorError;
use indexmap::IndexMap;
use serde_json::{Number, Value};

pub type NormalizedSpace = IndexMap<String, Vec<Value>>;

/// `(normalized, estimate)` — the Cartesian product size of `normalized`.
pub fn normalize_param_space(
    param_space: &Value,
    configured_limit: u64,
) -> Result<(NormalizedSpace, u64), OrchestratorError> {
    let object = param_space.as_object().filter(|o| !o.is_empty()).ok_or_else(|| {
        OrchestratorError::param_invalid("paramSpace must be a non-empty object")
    })?;

    let mut normalized = NormalizedSpace::new();
    let mut estimate: u64 = 1;
    for (key, raw) in object {
        let values = normalize_dimension(key, raw)?;
        estimate = safe_multiply(estimate, values.len() as u64, configured_limit, key)?;
        normalized.insert(key.clone(), values);
    }

    if estimate > configured_limit {
        return Err(OrchestratorError::param_invalid_with(
            "param space too large",
            serde_json::json!({ "limit": configured_limit, "estimate": estimate }),
        ));
    }

    Ok((normalized, estimate))
}

fn normalize_dimension(key: &str, raw: &Value) -> Result<Vec<Value>, OrchestratorError> {
    match raw {
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().filter(|v| !v.is_null()).cloned().collect();
            if values.is_empty() {
                return Err(OrchestratorError::param_invalid(format!(
                    "paramSpace.{key} requires at least one value"
                )));
            }
            Ok(values)
        }
        Value::Object(obj) if has_range_keys(obj) => {
            let start = numeric_field(obj, "start", key)?;
            let end = numeric_field(obj, "end", key)?;
            let step = numeric_field(obj, "step", key)?;
            let values = expand_range(key, start, end, step)?;
            Ok(values
                .into_iter()
                .map(|v| Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null))
                .collect())
        }
        Value::Number(_) | Value::String(_) | Value::Bool(_) => Ok(vec![raw.clone()]),
        _ => Err(OrchestratorError::param_invalid(format!(
            "paramSpace.{key} is unsupported"
        ))),
    }
}

fn has_range_keys(obj: &serde_json::Map<String, Value>) -> bool {
    obj.contains_key("start") && obj.contains_key("end") && obj.contains_key("step")
}

fn numeric_field(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    key: &str,
) -> Result<f64, OrchestratorError> {
    obj.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            OrchestratorError::param_invalid(format!(
                "paramSpace.{key} range requires numeric start/end/step"
            ))
        })
}

/// Two-stage overflow guard: reject adversarial grids before the final
/// `estimate > configured_limit` check runs.
fn safe_multiply(
    current: u64,
    factor: u64,
    limit: u64,
    key: &str,
) -> Result<u64, OrchestratorError> {
    if factor == 0 {
        return Err(OrchestratorError::param_invalid_with(
            "param space dimension must contain values",
            serde_json::json!({ "field": key, "factor": factor }),
        ));
    }
    let product = current.saturating_mul(factor);
    let guard = limit.max(500).saturating_mul(4);
    if product > guard {
        return Err(OrchestratorError::param_invalid_with(
            "param space exceeds safe processing window",
            serde_json::json!({ "estimate": product, "limit": limit }),
        ));
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_lists_ranges_and_scalars() {
        let space = json!({
            "x": [1, 2, 3],
            "y": {"start": 0.0, "end": 1.0, "step": 0.5},
            "z": "fixed",
        });
        let (normalized, estimate) = normalize_param_space(&space, 500).unwrap();
        assert_eq!(normalized["x"].len(), 3);
        assert_eq!(normalized["y"].len(), 3);
        assert_eq!(normalized["z"].len(), 1);
        assert_eq!(estimate, 9);
    }

    #[test]
    fn drops_null_entries_but_rejects_all_null() {
        let space = json!({"x": [1, null, 2]});
        let (normalized, _) = normalize_param_space(&space, 500).unwrap();
        assert_eq!(normalized["x"].len(), 2);

        let all_null = json!({"x": [null, null]});
        assert!(normalize_param_space(&all_null, 500).is_err());
    }

    #[test]
    fn boundary_estimate_exactly_at_limit_succeeds_one_over_fails() {
        let space = json!({"x": (0..500).collect::<Vec<_>>()});
        assert!(normalize_param_space(&space, 500).is_ok());

        let too_big = json!({"x": (0..501).collect::<Vec<_>>()});
        assert!(normalize_param_space(&too_big, 500).is_err());
    }

    #[test]
    fn rejects_empty_param_space() {
        assert!(normalize_param_space(&json!({}), 500).is_err());
        assert!(normalize_param_space(&json!(null), 500).is_err());
    }

    #[test]
    fn safe_multiply_guard_trips_before_final_limit_check() {
        // Two dimensions of 2000 each: running product exceeds max(limit,500)*4
        // long before the full Cartesian size would be known.
        let space = json!({
            "x": (0..2000).collect::<Vec<_>>(),
            "y": (0..2000).collect::<Vec<_>>(),
        });
        let err = normalize_param_space(&space, 500).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ParamInvalid);
    }
}
