// rust/pipeline-core/src/dataset/plan.rs

//! A dataset with every parameter bound to a concrete value.

use std::path::PathBuf;
use std::sync::Arc;

use super::batch::BatchCursor;
use super::cursor::{Cursor, SourceCursor};
use super::prefetch::PrefetchCursor;
use super::repeat::RepeatCursor;
use crate::error::Result;
use crate::io::ReaderOptions;
use crate::readers::ReaderKind;

/// Files and options of a resolved source dataset.
#[derive(Debug)]
pub(crate) struct SourcePlan {
    pub kind: ReaderKind,
    pub filenames: Vec<PathBuf>,
    pub options: ReaderOptions,
}

/// Cheap to clone; `Repeat` reopens its input from the plan each epoch.
#[derive(Debug, Clone)]
pub(crate) enum Plan {
    Source(Arc<SourcePlan>),
    /// `count == None` repeats forever.
    Repeat { input: Box<Plan>, count: Option<u64> },
    Batch { input: Box<Plan>, batch_size: usize },
    Prefetch { input: Box<Plan>, buffer_size: usize },
}

impl Plan {
    /// Creates a cursor positioned at the start of the sequence.
    pub(crate) fn open(&self) -> Result<Box<dyn Cursor>> {
        let cursor: Box<dyn Cursor> = match self {
            Self::Source(source) => Box::new(SourceCursor::new(Arc::clone(source))),
            Self::Repeat { input, count } => {
                Box::new(RepeatCursor::new(input.as_ref().clone(), *count))
            }
            Self::Batch { input, batch_size } => {
                Box::new(BatchCursor::new(input.open()?, *batch_size))
            }
            Self::Prefetch { input, buffer_size } => {
                Box::new(PrefetchCursor::spawn(input.open()?, *buffer_size)?)
            }
        };
        Ok(cursor)
    }
}
