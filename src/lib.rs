//! Epoch-tagged dataflow execution core
//!
//! This crate builds and runs small dataflow programs: records tagged with a
//! logical epoch are pulled lazily from a source and pushed through an
//! ordered operator chain, one record at a time, with epoch progress tracked
//! per flow.
//!
//! # Example
//!
//! ```rust
//! use epochflow::{Dataflow, Executor, IteratorSource};
//! use serde_json::json;
//!
//! # fn main() -> epochflow::Result<()> {
//! // Double every number, drop the small results, and print what's left.
//! let flow = Dataflow::new(IteratorSource::from_pairs(vec![(0, 1), (0, 2), (1, 3)]))
//!     .map(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2)))
//!     .filter(|v| Ok(v.as_i64().unwrap_or(0) > 2))
//!     .inspect(|v| {
//!         println!("saw {v}");
//!         Ok(())
//!     });
//!
//! let mut executor = Executor::new();
//! executor.add_dataflow(flow);
//!
//! let report = executor.build_and_run()?;
//! assert_eq!(report.flows[0].stats.records_completed, 2);
//! assert_eq!(report.flows[0].frontier, Some(1));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod frontier;
pub mod pipeline;
pub mod record;
pub mod source;

// Re-export the types a dataflow program touches directly
pub use config::ExecutorConfig;
pub use error::{CallbackError, EngineError, FrontierError, OperatorError, Result};
pub use frontier::Frontier;
pub use pipeline::{
    Dataflow, Executor, FlowReport, FlowStats, Operator, OperatorChain, OperatorKind, RunReport,
};
pub use record::{Epoch, Record, Value};
pub use source::{IteratorSource, Source};
