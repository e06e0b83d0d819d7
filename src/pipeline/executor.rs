//! Synchronous executor for driving dataflows to completion
//!
//! The executor owns the run loop: it pulls records from each flow's source
//! one at a time, checks epoch progress against the flow's frontier, pushes
//! the record through the operator chain, and keeps per-flow counters. It
//! blocks until every attached flow's source is exhausted or failed.

use crate::config::ExecutorConfig;
use crate::error::{EngineError, Result};
use crate::frontier::Frontier;
use crate::pipeline::builder::Dataflow;
use crate::record::Epoch;
use crate::source::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

/// Counters accumulated while driving one dataflow
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FlowStats {
    /// Records pulled from the source
    pub records_pulled: u64,

    /// Records dropped mid-chain (filter miss, `None`, empty fan-out)
    pub records_dropped: u64,

    /// Records that survived the full chain
    pub records_completed: u64,
}

impl FlowStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment records pulled.
    pub fn inc_records_pulled(&mut self) {
        self.records_pulled += 1;
    }

    /// Increment records dropped.
    pub fn inc_records_dropped(&mut self) {
        self.records_dropped += 1;
    }

    /// Increment records completed.
    pub fn inc_records_completed(&mut self) {
        self.records_completed += 1;
    }
}

/// Outcome of one completed dataflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReport {
    /// Name of the flow
    pub flow: String,

    /// Counters accumulated while driving the flow
    pub stats: FlowStats,

    /// Highest epoch observed before the source closed; `None` when the
    /// source produced nothing
    pub frontier: Option<Epoch>,
}

/// Summary of a completed [`Executor::build_and_run`] call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// One report per completed flow, in attach order
    pub flows: Vec<FlowReport>,
}

impl RunReport {
    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Synchronous executor that drives attached dataflows to completion
///
/// Flows run one after another in attach order, each strictly one record at
/// a time: a record passes through the whole operator chain before the next
/// one is pulled. The executor is spent by [`build_and_run`](Executor::build_and_run),
/// which takes it by value.
///
/// # Example
///
/// ```rust
/// use epochflow::pipeline::{Dataflow, Executor};
/// use epochflow::source::IteratorSource;
/// use serde_json::json;
///
/// # fn main() -> epochflow::Result<()> {
/// let flow = Dataflow::named("double", IteratorSource::from_pairs(vec![(0, 1), (1, 2)]))
///     .map(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2)));
///
/// let mut executor = Executor::new();
/// executor.add_dataflow(flow);
///
/// let report = executor.build_and_run()?;
/// assert_eq!(report.flows[0].stats.records_completed, 2);
/// assert_eq!(report.flows[0].frontier, Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Executor {
    config: ExecutorConfig,
    dataflows: Vec<Dataflow>,
}

impl Executor {
    /// Create a new executor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create a new executor with the given configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            dataflows: Vec::new(),
        }
    }

    /// Attach a dataflow; attached flows run in attach order.
    pub fn add_dataflow(&mut self, dataflow: Dataflow) {
        debug!(
            flow = %dataflow.name(),
            operators = dataflow.operator_count(),
            "Dataflow attached"
        );
        self.dataflows.push(dataflow);
    }

    /// Get the number of attached dataflows.
    pub fn dataflow_count(&self) -> usize {
        self.dataflows.len()
    }

    /// Drive every attached dataflow until its source is exhausted.
    ///
    /// A failure aborts only the affected flow; remaining flows still run
    /// unless [`ExecutorConfig::fail_fast`] is set. Every failure is logged
    /// as it happens and the first one (in attach order) is returned once
    /// the run is over.
    pub fn build_and_run(self) -> Result<RunReport> {
        let Executor { config, dataflows } = self;
        let started_at = Utc::now();
        info!(flows = dataflows.len(), "Starting run");

        let mut flows = Vec::with_capacity(dataflows.len());
        let mut first_failure: Option<EngineError> = None;

        for dataflow in dataflows {
            let name = dataflow.name().to_string();
            match Self::run_dataflow(&config, dataflow) {
                Ok(report) => flows.push(report),
                Err(err) => {
                    error!(flow = %name, error = %err, "Dataflow failed");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                    if config.fail_fast {
                        break;
                    }
                }
            }
        }

        if let Some(err) = first_failure {
            return Err(err);
        }

        let finished_at = Utc::now();
        info!(
            flows = flows.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "Run complete"
        );

        Ok(RunReport {
            started_at,
            finished_at,
            flows,
        })
    }

    /// Drive one dataflow to completion.
    fn run_dataflow(config: &ExecutorConfig, dataflow: Dataflow) -> Result<FlowReport> {
        let (name, mut source, mut chain) = dataflow.into_parts();
        info!(flow = %name, operators = chain.len(), "Starting dataflow");

        let mut frontier = Frontier::new();
        let mut stats = FlowStats::new();

        while let Some(record) = source.next_record() {
            stats.inc_records_pulled();
            let (epoch, value) = record.into_parts();

            // The regression check runs before the chain sees the record.
            if let Some(advanced) = frontier.observe(epoch)? {
                debug!(flow = %name, epoch = advanced, "Frontier advanced");
            }

            trace!(flow = %name, epoch, "Processing record");
            let outputs = chain.process(epoch, value)?;
            if outputs.is_empty() {
                stats.inc_records_dropped();
                debug!(flow = %name, epoch, "Record dropped");
            } else {
                // Terminal output is discarded; only the count survives.
                stats.inc_records_completed();
            }

            if config.progress_every > 0 && stats.records_pulled % config.progress_every == 0 {
                debug!(
                    flow = %name,
                    pulled = stats.records_pulled,
                    dropped = stats.records_dropped,
                    frontier = %frontier,
                    "Progress"
                );
            }
        }

        frontier.close();
        info!(
            flow = %name,
            pulled = stats.records_pulled,
            dropped = stats.records_dropped,
            completed = stats.records_completed,
            frontier = %frontier,
            "Source exhausted, dataflow complete"
        );

        Ok(FlowReport {
            flow: name,
            stats,
            frontier: frontier.current(),
        })
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
