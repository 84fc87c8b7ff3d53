//! Early-stop policy and the reason a job was locked.

use serde::{Deserialize, Serialize};

/// Direction a score must cross the threshold to trigger an early stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopMode {
    Min,
    Max,
}

/// Immutable once set on a job at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyStopPolicy {
    pub metric: String,
    pub threshold: f64,
    pub mode: StopMode,
}

/// Why a job transitioned into a terminal locked state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StopReason {
    #[serde(rename = "EARLY_STOP_THRESHOLD")]
    EarlyStopThreshold {
        metric: String,
        threshold: f64,
        score: f64,
        mode: StopMode,
    },
    #[serde(rename = "CANCELED")]
    Canceled {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl StopReason {
    pub const fn kind(&self) -> &'static str {
        match self {
            StopReason::EarlyStopThreshold { .. } => "EARLY_STOP_THRESHOLD",
            StopReason::Canceled { .. } => "CANCELED",
        }
    }
}
