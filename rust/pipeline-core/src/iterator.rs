// rust/pipeline-core/src/iterator.rs

//! The stateful, re-initializable handle over a dataset.
//!
//! ```text
//!  Unbound --initialize--> Bound --get_next: end--> Exhausted
//!                            ^                          |
//!                            +-------initialize---------+
//! ```
//!
//! Every `initialize` discards the current cursor, closing its files, and
//! builds a fresh one. Once exhausted, `get_next` keeps returning
//! `OutOfRange` without touching any file until the next `initialize`.

use std::fmt;

use crate::dataset::{Cursor, DType, Dataset, ElementSpec, Feed, Value};
use crate::error::{PipelineError, Result};

/// Externally visible lifecycle state of a [`DatasetIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorStatus {
    Unbound,
    Bound,
    Exhausted,
}

enum State {
    Unbound,
    Bound(Box<dyn Cursor>),
    Exhausted,
}

/// Pull-based consumer of a [`Dataset`].
///
/// Not meant for concurrent use: `get_next` takes `&mut self`.
pub struct DatasetIterator {
    signature: ElementSpec,
    state: State,
}

impl DatasetIterator {
    /// Creates an unbound iterator that only accepts datasets whose output
    /// signature is compatible with `signature`.
    pub fn from_structure(signature: ElementSpec) -> Self {
        Self {
            signature,
            state: State::Unbound,
        }
    }

    /// Creates an iterator already bound to `dataset`.
    ///
    /// Only literal or defaulted parameters can be used, since nothing is fed.
    pub fn one_shot(dataset: &Dataset) -> Result<Self> {
        let mut iterator = Self::from_structure(dataset.output_signature());
        iterator.initialize(dataset, &Feed::new())?;
        Ok(iterator)
    }

    /// Binds this iterator to `dataset`, restarting the pipeline.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the dataset's signature is incompatible or a
    /// parameter cannot be resolved from `feed`, plus any error from
    /// [`Dataset::build`]. On error the previous binding is kept.
    pub fn initialize(&mut self, dataset: &Dataset, feed: &Feed) -> Result<()> {
        let dataset_signature = dataset.output_signature();
        if !self.signature.is_compatible_with(&dataset_signature) {
            return Err(PipelineError::invalid_argument(format!(
                "dataset produces {dataset_signature}, which is not compatible with the \
                 iterator's {}",
                self.signature
            )));
        }

        let cursor = dataset.build(feed)?;
        // Replacing the state drops the previous cursor and its open file.
        self.state = State::Bound(cursor);
        tracing::debug!("Iterator initialized for {}", dataset_signature);
        Ok(())
    }

    /// Returns the next element.
    ///
    /// # Errors
    ///
    /// - `FailedPrecondition` before the first `initialize`
    /// - `OutOfRange` at the end of the sequence, and on every call after
    /// - whatever the pipeline reports (`NotFound`, `DataLoss`, ...)
    pub fn get_next(&mut self) -> Result<Value> {
        match &mut self.state {
            State::Unbound => Err(PipelineError::failed_precondition(
                "get_next called on an iterator that has not been initialized",
            )),
            State::Exhausted => Err(end_of_sequence()),
            State::Bound(cursor) => match cursor.next_element()? {
                Some(value) => Ok(value),
                None => {
                    self.state = State::Exhausted;
                    Err(end_of_sequence())
                }
            },
        }
    }

    pub fn status(&self) -> IteratorStatus {
        match self.state {
            State::Unbound => IteratorStatus::Unbound,
            State::Bound(_) => IteratorStatus::Bound,
            State::Exhausted => IteratorStatus::Exhausted,
        }
    }

    pub fn output_signature(&self) -> &ElementSpec {
        &self.signature
    }
}

impl Default for DatasetIterator {
    /// An iterator accepting any string dataset.
    fn default() -> Self {
        Self::from_structure(ElementSpec::of_type(DType::String))
    }
}

impl fmt::Debug for DatasetIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetIterator")
            .field("signature", &self.signature)
            .field("status", &self.status())
            .finish()
    }
}

/// Yields elements until `OutOfRange`; other errors are yielded as items.
impl Iterator for DatasetIterator {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_next() {
            Ok(value) => Some(Ok(value)),
            Err(e) if e.is_out_of_range() => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn end_of_sequence() -> PipelineError {
    PipelineError::out_of_range("End of sequence")
}
