//! Top-level query streams.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use super::Solutions;
use crate::raw::RawError;
use crate::unify::Bindings;

/// A recoverable error raised while a query was being resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: RawError,
    },
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Shared slot where a builtin records the first error of a query.
pub(crate) type FailureSlot = Arc<Mutex<Option<ResolveError>>>;

pub(crate) fn take_failure(slot: &FailureSlot) -> Option<ResolveError> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Outcome of asking a query stream for its next answer.
#[derive(Debug)]
pub enum QueryResult {
    Answer(Bindings),
    Exhausted,
    Failed(ResolveError),
}

/// Lazily yields the solutions of one top-level query.
///
/// After an error is surfaced, or the solutions run out, the stream is done and
/// keeps returning `None` / [`QueryResult::Exhausted`].
pub struct QueryStream {
    solutions: Solutions,
    failure: FailureSlot,
    done: bool,
}

impl QueryStream {
    pub(crate) fn new(solutions: Solutions, failure: FailureSlot) -> Self {
        QueryStream {
            solutions,
            failure,
            done: false,
        }
    }

    pub fn next_answer(&mut self) -> QueryResult {
        match self.next() {
            Some(Ok(bindings)) => QueryResult::Answer(bindings),
            Some(Err(err)) => QueryResult::Failed(err),
            None => QueryResult::Exhausted,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl Iterator for QueryStream {
    type Item = Result<Bindings, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(err) = take_failure(&self.failure) {
            self.done = true;
            return Some(Err(err));
        }
        match self.solutions.next() {
            // An error recorded while producing this answer comes first.
            Some(bindings) => match take_failure(&self.failure) {
                Some(err) => {
                    self.done = true;
                    Some(Err(err))
                }
                None => Some(Ok(bindings)),
            },
            None => {
                self.done = true;
                take_failure(&self.failure).map(Err)
            }
        }
    }
}

impl std::fmt::Debug for QueryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStream")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
