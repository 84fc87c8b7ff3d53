//! Derived result-summary stub, created lazily on first successful score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummaryStub {
    pub id: String,
    pub owner_id: String,
    pub metrics: ResultMetrics,
    pub artifacts: Vec<Artifact>,
    pub equity_curve_ref: String,
    pub trades_ref: String,
    pub created_at: DateTime<Utc>,
}

impl ResultSummaryStub {
    /// Build a fresh stub for a task that just reported `score` under `result_summary_id`.
    pub fn new(id: String, owner_id: String, score: Option<f64>, now: DateTime<Utc>) -> Self {
        let artifacts = vec![
            Artifact {
                kind: "metrics".to_string(),
                url: format!("artifacts/{id}/metrics.json"),
            },
            Artifact {
                kind: "equity".to_string(),
                url: format!("artifacts/{id}/equity.json"),
            },
            Artifact {
                kind: "trades".to_string(),
                url: format!("artifacts/{id}/trades.json"),
            },
        ];
        Self {
            equity_curve_ref: format!("artifacts/{id}/equity.json"),
            trades_ref: format!("artifacts/{id}/trades.json"),
            id,
            owner_id,
            metrics: ResultMetrics { score },
            artifacts,
            created_at: now,
        }
    }
}
