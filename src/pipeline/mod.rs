//! Dataflow pipelines: declarative operator graphs and their executor
//!
//! This module provides the pieces a dataflow program is assembled from:
//! - Fluent dataflow builder API
//! - Record operators (map, flat_map, filter, filter_map, inspect, inspect_epoch)
//! - A synchronous executor that drives sources to exhaustion
//! - Per-flow frontier tracking and run reports
//!
//! # Example
//!
//! ```rust
//! use epochflow::pipeline::{Dataflow, Executor};
//! use epochflow::source::IteratorSource;
//! use serde_json::json;
//!
//! # fn main() -> epochflow::Result<()> {
//! let source = IteratorSource::from_pairs(vec![(0, 1), (0, 2), (1, 3)]);
//! let flow = Dataflow::new(source)
//!     .map(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2)))
//!     .filter(|v| Ok(v.as_i64().unwrap_or(0) > 2));
//!
//! let mut executor = Executor::new();
//! executor.add_dataflow(flow);
//! let report = executor.build_and_run()?;
//! assert_eq!(report.flows.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod executor;
pub mod operator;

pub use builder::Dataflow;
pub use executor::{Executor, FlowReport, FlowStats, RunReport};
pub use operator::{
    ApplyError, FilterMapOperator, FilterOperator, FlatMapOperator, InspectEpochOperator,
    InspectOperator, MapOperator, Operator, OperatorChain, OperatorKind,
};
