//! Record and epoch types for the dataflow core

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical timestamp attached to every record.
///
/// Epochs are unsigned and monotone non-decreasing within a single source.
/// They do not have to be contiguous or start at zero.
pub type Epoch = u64;

/// Dynamic record payload.
///
/// Sources are free to mix shapes within one stream (integers next to
/// strings, objects next to nulls); the engine only forwards values, it
/// never interprets them. Interpreting a value is the job of the operator
/// callbacks, and a shape they cannot handle is their failure to report.
pub use serde_json::Value;

/// The unit of data flowing through a dataflow: an (epoch, value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Logical timestamp used for ordering and progress tracking
    pub epoch: Epoch,
    /// Payload carried through the operator chain
    pub value: Value,
}

impl Record {
    /// Create a record at the given epoch.
    pub fn new(epoch: Epoch, value: impl Into<Value>) -> Self {
        Self {
            epoch,
            value: value.into(),
        }
    }

    /// Split the record into its epoch and value.
    pub fn into_parts(self) -> (Epoch, Value) {
        (self.epoch, self.value)
    }
}

impl<V: Into<Value>> From<(Epoch, V)> for Record {
    fn from((epoch, value): (Epoch, V)) -> Self {
        Self::new(epoch, value)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.epoch, self.value)
    }
}
