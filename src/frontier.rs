//! Epoch progress tracking for dataflows
//!
//! A [`Frontier`] records, per dataflow, how far processing has advanced
//! through the source's epochs. In the single-worker, single-source case the
//! frontier is simply the highest epoch observed so far, plus a closed flag
//! set when the source is exhausted. It is also the one place that enforces
//! the source's monotonicity contract.
//!
//! # Example
//!
//! ```rust
//! use epochflow::Frontier;
//!
//! let mut frontier = Frontier::new();
//! assert_eq!(frontier.current(), None);
//!
//! assert_eq!(frontier.observe(0).unwrap(), Some(0)); // advanced
//! assert_eq!(frontier.observe(0).unwrap(), None);    // unchanged
//! assert_eq!(frontier.observe(2).unwrap(), Some(2)); // advanced again
//! assert!(frontier.observe(1).is_err());             // regression
//!
//! frontier.close();
//! assert!(frontier.is_closed());
//! assert_eq!(frontier.current(), Some(2));
//! ```

use std::fmt;

use crate::error::{FrontierError, FrontierResult};
use crate::record::Epoch;

/// Tracks the epoch boundary below which all processing is complete.
///
/// Starts with no epoch observed. Each pulled record's epoch is fed through
/// [`Frontier::observe`], which advances the frontier monotonically and
/// rejects regressions; [`Frontier::close`] marks the source exhausted and
/// the dataflow's progress final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    seen: Option<Epoch>,
    closed: bool,
}

impl Frontier {
    /// Creates a frontier in the initial state: nothing observed, not closed.
    pub fn new() -> Self {
        Self {
            seen: None,
            closed: false,
        }
    }

    /// Feeds one observed epoch through the frontier.
    ///
    /// Returns `Ok(Some(epoch))` when the frontier advanced, `Ok(None)` when
    /// the epoch matched the frontier (no movement), and
    /// [`FrontierError::EpochRegression`] when the epoch is behind the
    /// frontier. Must not be called after [`Frontier::close`].
    pub fn observe(&mut self, epoch: Epoch) -> FrontierResult<Option<Epoch>> {
        debug_assert!(!self.closed, "observe called on a closed frontier");
        match self.seen {
            Some(frontier) if epoch < frontier => Err(FrontierError::EpochRegression {
                frontier,
                offending: epoch,
            }),
            Some(frontier) if epoch == frontier => Ok(None),
            _ => {
                self.seen = Some(epoch);
                Ok(Some(epoch))
            }
        }
    }

    /// Marks the source exhausted; the frontier is final from here on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// The highest epoch observed so far, or `None` before the first record.
    pub fn current(&self) -> Option<Epoch> {
        self.seen
    }

    /// True once the source is exhausted and progress is final.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True while no record has been observed yet.
    pub fn is_initial(&self) -> bool {
        self.seen.is_none()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Frontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.seen, self.closed) {
            (None, false) => write!(f, "initial"),
            (None, true) => write!(f, "closed(empty)"),
            (Some(epoch), false) => write!(f, "epoch {epoch}"),
            (Some(epoch), true) => write!(f, "closed(epoch {epoch})"),
        }
    }
}
