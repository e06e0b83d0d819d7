//! Executor configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for [`Executor`](crate::Executor) runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Stop the run at the first failed dataflow instead of letting the
    /// remaining attached dataflows run to completion.
    #[serde(default)]
    pub fail_fast: bool,

    /// Emit a progress log line every N pulled records per dataflow.
    /// 0 disables progress logging.
    #[serde(default = "default_progress_every")]
    pub progress_every: u64,
}

fn default_progress_every() -> u64 {
    0
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            progress_every: default_progress_every(),
        }
    }
}

impl ExecutorConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
