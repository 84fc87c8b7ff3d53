//! Aggregate job summary and Top-N leaderboard entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNEntry {
    pub task_id: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_summary_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSummary {
    pub total: usize,
    pub finished: usize,
    pub running: usize,
    pub throttled: usize,
    pub top_n: Vec<TopNEntry>,
}

impl OptimizationSummary {
    pub fn empty(total: usize) -> Self {
        Self {
            total,
            finished: 0,
            running: 0,
            throttled: 0,
            top_n: Vec::new(),
        }
    }
}
