//! Dataflow builder for fluent operator chaining
//!
//! This module provides the declarative half of the engine: a [`Dataflow`]
//! records a source and an ordered operator chain without running any of it.
//! Execution belongs to [`Executor`](crate::pipeline::Executor).

use crate::error::CallbackError;
use crate::pipeline::operator::{
    FilterMapOperator, FilterOperator, FlatMapOperator, InspectEpochOperator, InspectOperator,
    MapOperator, OperatorChain,
};
use crate::record::{Epoch, Value};
use crate::source::Source;
use std::fmt::Debug;
use uuid::Uuid;

/// A declared, not-yet-executed dataflow: one source plus an ordered
/// operator chain
///
/// Each chaining call appends one operator and returns the dataflow, so a
/// chain reads in its evaluation order. Nothing runs at build time; callback
/// shapes are checked at compile time by each method's closure bound.
///
/// # Example
///
/// ```rust
/// use epochflow::pipeline::Dataflow;
/// use epochflow::source::IteratorSource;
/// use serde_json::json;
///
/// let flow = Dataflow::named("doubler", IteratorSource::from_pairs(vec![(0, 3)]))
///     .map(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2)))
///     .inspect(|v| {
///         println!("saw {v}");
///         Ok(())
///     });
///
/// assert_eq!(flow.name(), "doubler");
/// assert_eq!(flow.operator_count(), 2);
/// ```
pub struct Dataflow {
    name: String,
    source: Box<dyn Source>,
    chain: OperatorChain,
}

impl Dataflow {
    /// Create a dataflow over `source` with an auto-generated name.
    pub fn new<S: Source + 'static>(source: S) -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        Self::named(format!("dataflow-{id}"), source)
    }

    /// Create a dataflow over `source` with an explicit name.
    ///
    /// The name identifies the flow in logs, failure reports, and the
    /// [`RunReport`](crate::pipeline::RunReport).
    pub fn named<N: Into<String>, S: Source + 'static>(name: N, source: S) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
            chain: OperatorChain::new(),
        }
    }

    /// Get the dataflow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of operators attached so far.
    pub fn operator_count(&self) -> usize {
        self.chain.len()
    }

    /// Append a one-to-one transform stage.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use epochflow::pipeline::Dataflow;
    /// # use epochflow::source::IteratorSource;
    /// # use serde_json::json;
    /// let flow = Dataflow::new(IteratorSource::empty())
    ///     .map(|v| Ok(json!(v.as_i64().unwrap_or(0) + 1)));
    /// ```
    pub fn map<F>(mut self, func: F) -> Self
    where
        F: FnMut(Value) -> Result<Value, CallbackError> + Send + 'static,
    {
        self.chain.push(MapOperator::new(func));
        self
    }

    /// Append a one-to-many transform stage.
    ///
    /// Every value the callback produces continues downstream under the
    /// input's epoch, in production order; an empty output drops the record.
    pub fn flat_map<F>(mut self, func: F) -> Self
    where
        F: FnMut(Value) -> Result<Vec<Value>, CallbackError> + Send + 'static,
    {
        self.chain.push(FlatMapOperator::new(func));
        self
    }

    /// Append a predicate stage; records failing the predicate are dropped.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use epochflow::pipeline::Dataflow;
    /// # use epochflow::source::IteratorSource;
    /// let flow = Dataflow::new(IteratorSource::empty())
    ///     .filter(|v| Ok(v.as_i64().unwrap_or(0) % 2 == 0));
    /// ```
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&Value) -> Result<bool, CallbackError> + Send + 'static,
    {
        self.chain.push(FilterOperator::new(predicate));
        self
    }

    /// Append a combined transform-and-drop stage.
    ///
    /// `None` drops the record; `Some` replaces its value.
    pub fn filter_map<F>(mut self, func: F) -> Self
    where
        F: FnMut(Value) -> Result<Option<Value>, CallbackError> + Send + 'static,
    {
        self.chain.push(FilterMapOperator::new(func));
        self
    }

    /// Append an observation stage; the value passes through unchanged.
    pub fn inspect<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Value) -> Result<(), CallbackError> + Send + 'static,
    {
        self.chain.push(InspectOperator::new(callback));
        self
    }

    /// Append an epoch-aware observation stage; pass-through like
    /// [`inspect`](Dataflow::inspect).
    pub fn inspect_epoch<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Epoch, &Value) -> Result<(), CallbackError> + Send + 'static,
    {
        self.chain.push(InspectEpochOperator::new(callback));
        self
    }

    /// Split the dataflow into the pieces the executor drives.
    pub(crate) fn into_parts(self) -> (String, Box<dyn Source>, OperatorChain) {
        (self.name, self.source, self.chain)
    }
}

impl Debug for Dataflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataflow")
            .field("name", &self.name)
            .field("operator_count", &self.chain.len())
            .finish()
    }
}
