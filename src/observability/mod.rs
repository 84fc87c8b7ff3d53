//! Structured JSON log-line emission and metric counters/gauges.

mod emit;
mod mask;
pub mod metrics;
mod schema;

pub use emit::{log_enqueue, log_end, log_error, log_stop, log_start};
pub use mask::mask;
pub use schema::{LogEvent, Phase};
