//! Operators for transforming records in a dataflow
//!
//! This module provides the stages a [`Dataflow`](crate::pipeline::Dataflow)
//! chains together:
//! - Map: transform values one-to-one
//! - FlatMap: transform values one-to-many
//! - Filter: keep values matching a predicate
//! - FilterMap: transform and filter in a single step
//! - Inspect / InspectEpoch: observe values without changing them
//!
//! Operators are driven one record at a time by the executor; none of them
//! runs at chain-build time.

use crate::error::{CallbackError, OperatorError, OperatorResult};
use crate::record::{Epoch, Value};
use std::fmt::Debug;

/// The evaluation semantics of an operator stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// One value in, one value out.
    Map,
    /// One value in, zero or more values out.
    FlatMap,
    /// Pass or drop based on a predicate.
    Filter,
    /// Transform and drop in a single step.
    FilterMap,
    /// Side effect only; the value passes through unchanged.
    Inspect,
    /// Epoch-aware side effect; the value passes through unchanged.
    InspectEpoch,
}

impl OperatorKind {
    /// Lowercase name used in logs and failure reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Map => "map",
            OperatorKind::FlatMap => "flat_map",
            OperatorKind::Filter => "filter",
            OperatorKind::FilterMap => "filter_map",
            OperatorKind::Inspect => "inspect",
            OperatorKind::InspectEpoch => "inspect_epoch",
        }
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by a single operator application.
///
/// Carries the value exactly as the operator received it, so failure reports
/// name what the callback actually choked on; the chain adds the operator's
/// position and name when wrapping this into an [`OperatorError`].
#[derive(Debug)]
pub struct ApplyError {
    /// The value handed to the operator when its callback failed.
    pub value: Value,
    /// The callback's own error.
    pub source: CallbackError,
}

/// Trait for dataflow operators
///
/// Each operator wraps one user callback and declares its kind. The executor
/// applies operators strictly in chain order, one record at a time.
pub trait Operator: Send + Debug {
    /// The operator's declared kind.
    fn kind(&self) -> OperatorKind;

    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Apply the operator to one value.
    ///
    /// Returns the values continuing downstream under the same epoch; an
    /// empty vector drops the record.
    fn apply(&mut self, epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError>;
}

/// Map operator - transforms values one-to-one
///
/// # Example
///
/// ```rust
/// use epochflow::pipeline::MapOperator;
/// use serde_json::json;
///
/// // Doubles every value that flows through it
/// let operator = MapOperator::new(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2)));
/// ```
pub struct MapOperator<F> {
    func: F,
}

impl<F> MapOperator<F>
where
    F: FnMut(Value) -> Result<Value, CallbackError> + Send,
{
    /// Create a new map operator.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for MapOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for MapOperator<F>
where
    F: FnMut(Value) -> Result<Value, CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::Map
    }

    fn apply(&mut self, _epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        // The callback consumes the value; keep a copy for the failure report.
        let snapshot = value.clone();
        match (self.func)(value) {
            Ok(out) => Ok(vec![out]),
            Err(source) => Err(ApplyError {
                value: snapshot,
                source,
            }),
        }
    }
}

/// FlatMap operator - transforms values one-to-many
///
/// Every produced value continues downstream under the input's epoch, in
/// production order. An empty output drops the record.
///
/// # Example
///
/// ```rust
/// use epochflow::pipeline::FlatMapOperator;
/// use serde_json::json;
///
/// // Splits strings into one value per word
/// let operator = FlatMapOperator::new(|v| {
///     let words = v.as_str().unwrap_or("").split_whitespace();
///     Ok(words.map(|w| json!(w)).collect())
/// });
/// ```
pub struct FlatMapOperator<F> {
    func: F,
}

impl<F> FlatMapOperator<F>
where
    F: FnMut(Value) -> Result<Vec<Value>, CallbackError> + Send,
{
    /// Create a new flat_map operator.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FlatMapOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatMapOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for FlatMapOperator<F>
where
    F: FnMut(Value) -> Result<Vec<Value>, CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::FlatMap
    }

    fn apply(&mut self, _epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        let snapshot = value.clone();
        match (self.func)(value) {
            Ok(out) => Ok(out),
            Err(source) => Err(ApplyError {
                value: snapshot,
                source,
            }),
        }
    }
}

/// Filter operator - keeps values matching a predicate
///
/// # Example
///
/// ```rust
/// use epochflow::pipeline::FilterOperator;
///
/// // Only passes even numbers
/// let operator = FilterOperator::new(|v| Ok(v.as_i64().unwrap_or(0) % 2 == 0));
/// ```
pub struct FilterOperator<F> {
    predicate: F,
}

impl<F> FilterOperator<F>
where
    F: FnMut(&Value) -> Result<bool, CallbackError> + Send,
{
    /// Create a new filter operator.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> Debug for FilterOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for FilterOperator<F>
where
    F: FnMut(&Value) -> Result<bool, CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::Filter
    }

    fn apply(&mut self, _epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        match (self.predicate)(&value) {
            Ok(true) => Ok(vec![value]),
            Ok(false) => Ok(Vec::new()),
            Err(source) => Err(ApplyError { value, source }),
        }
    }
}

/// FilterMap operator - transforms and filters in a single step
///
/// `None` drops the record; `Some` replaces its value.
pub struct FilterMapOperator<F> {
    func: F,
}

impl<F> FilterMapOperator<F>
where
    F: FnMut(Value) -> Result<Option<Value>, CallbackError> + Send,
{
    /// Create a new filter_map operator.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FilterMapOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterMapOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for FilterMapOperator<F>
where
    F: FnMut(Value) -> Result<Option<Value>, CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::FilterMap
    }

    fn apply(&mut self, _epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        let snapshot = value.clone();
        match (self.func)(value) {
            Ok(Some(out)) => Ok(vec![out]),
            Ok(None) => Ok(Vec::new()),
            Err(source) => Err(ApplyError {
                value: snapshot,
                source,
            }),
        }
    }
}

/// Inspect operator - observes values without changing them
///
/// Strictly pass-through: adding one anywhere in a chain cannot change what
/// reaches the stages after it.
pub struct InspectOperator<F> {
    callback: F,
}

impl<F> InspectOperator<F>
where
    F: FnMut(&Value) -> Result<(), CallbackError> + Send,
{
    /// Create a new inspect operator.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Debug for InspectOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for InspectOperator<F>
where
    F: FnMut(&Value) -> Result<(), CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::Inspect
    }

    fn apply(&mut self, _epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        match (self.callback)(&value) {
            Ok(()) => Ok(vec![value]),
            Err(source) => Err(ApplyError { value, source }),
        }
    }
}

/// InspectEpoch operator - observes (epoch, value) pairs without changing them
///
/// Pass-through like [`InspectOperator`], with the record's epoch visible to
/// the callback.
pub struct InspectEpochOperator<F> {
    callback: F,
}

impl<F> InspectEpochOperator<F>
where
    F: FnMut(Epoch, &Value) -> Result<(), CallbackError> + Send,
{
    /// Create a new inspect_epoch operator.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Debug for InspectEpochOperator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectEpochOperator").finish_non_exhaustive()
    }
}

impl<F> Operator for InspectEpochOperator<F>
where
    F: FnMut(Epoch, &Value) -> Result<(), CallbackError> + Send,
{
    fn kind(&self) -> OperatorKind {
        OperatorKind::InspectEpoch
    }

    fn apply(&mut self, epoch: Epoch, value: Value) -> Result<Vec<Value>, ApplyError> {
        match (self.callback)(epoch, &value) {
            Ok(()) => Ok(vec![value]),
            Err(source) => Err(ApplyError { value, source }),
        }
    }
}

/// Chain of operators applied sequentially to each record
pub struct OperatorChain {
    operators: Vec<Box<dyn Operator>>,
}

impl OperatorChain {
    /// Create a new, empty operator chain.
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// Append an operator to the end of the chain.
    pub fn push<O: Operator + 'static>(&mut self, operator: O) {
        self.operators.push(Box::new(operator));
    }

    /// Get the number of operators in the chain.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Push one record through every operator in chain order.
    ///
    /// Returns the values that survive the full chain; an empty vector means
    /// the record was dropped along the way and no later operator observed
    /// it. Fan-out from earlier operators is flattened in production order
    /// before the next operator runs.
    pub fn process(&mut self, epoch: Epoch, value: Value) -> OperatorResult<Vec<Value>> {
        let mut current = vec![value];
        for (index, op) in self.operators.iter_mut().enumerate() {
            let mut next = Vec::with_capacity(current.len());
            for item in current.drain(..) {
                match op.apply(epoch, item) {
                    Ok(outputs) => next.extend(outputs),
                    Err(ApplyError { value, source }) => {
                        return Err(OperatorError::Callback {
                            index,
                            operator: op.name().to_string(),
                            epoch,
                            value,
                            source,
                        });
                    }
                }
            }
            // Dropped records are final: stop before any later operator runs.
            if next.is_empty() {
                return Ok(next);
            }
            current = next;
        }
        Ok(current)
    }
}

impl Default for OperatorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for OperatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorChain")
            .field("operator_count", &self.operators.len())
            .finish()
    }
}
