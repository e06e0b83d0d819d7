//! Record sources
//!
//! A [`Source`] is the external collaborator a dataflow pulls its records
//! from: a lazy, ordered, single-pass sequence of (epoch, value) pairs. The
//! engine only ever asks for the next record; whether the sequence is
//! buffered, generated on demand, or replayable is up to the concrete
//! source.

use std::fmt;

use crate::record::{Epoch, Record, Value};

/// A lazy, single-pass producer of records.
///
/// Returning `None` signals exhaustion and is terminal for the run; the
/// engine will not poll again. Epochs must be monotone non-decreasing over
/// the life of the source. The engine rejects a regressing source as a
/// contract violation rather than reordering behind its back.
pub trait Source: Send {
    /// Pulls the next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> Option<Record>;
}

/// Adapts any record iterator into a [`Source`].
///
/// This is the usual way to feed a dataflow from in-memory data or a
/// generator-style iterator chain.
pub struct IteratorSource<I> {
    records: I,
}

impl<I> IteratorSource<I>
where
    I: Iterator<Item = Record> + Send,
{
    /// Wraps an iterator of records.
    pub fn new(records: impl IntoIterator<Item = Record, IntoIter = I>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl IteratorSource<std::vec::IntoIter<Record>> {
    /// Builds a source from (epoch, value) pairs.
    pub fn from_pairs<V, P>(pairs: P) -> Self
    where
        V: Into<Value>,
        P: IntoIterator<Item = (Epoch, V)>,
    {
        let records: Vec<Record> = pairs.into_iter().map(Record::from).collect();
        Self {
            records: records.into_iter(),
        }
    }
}

impl IteratorSource<std::iter::Empty<Record>> {
    /// A source that is exhausted from the start.
    pub fn empty() -> Self {
        Self {
            records: std::iter::empty(),
        }
    }
}

impl<I> Source for IteratorSource<I>
where
    I: Iterator<Item = Record> + Send,
{
    fn next_record(&mut self) -> Option<Record> {
        self.records.next()
    }
}

impl<I> fmt::Debug for IteratorSource<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorSource").finish_non_exhaustive()
    }
}
