// rust/pipeline-core/src/dataset/cursor.rs

use std::sync::Arc;

use super::element::Value;
use super::plan::SourcePlan;
use crate::error::Result;
use crate::readers::RecordReader;

/// Mutable progress through one build of a dataset.
///
/// A cursor is owned by exactly one iterator and pulled sequentially.
pub trait Cursor: Send {
    /// Produces the next element, or `Ok(None)` once the sequence is over.
    ///
    /// After `Ok(None)` every further call also returns `Ok(None)`. An error
    /// does not end the sequence; the next call resumes after the failure.
    fn next_element(&mut self) -> Result<Option<Value>>;
}

/// Reads every file of a source in order, one open file at a time.
pub(crate) struct SourceCursor {
    plan: Arc<SourcePlan>,
    file_index: usize,
    reader: Option<Box<dyn RecordReader>>,
    records_in_file: u64,
}

impl SourceCursor {
    pub(crate) fn new(plan: Arc<SourcePlan>) -> Self {
        Self {
            plan,
            file_index: 0,
            reader: None,
            records_in_file: 0,
        }
    }

    fn open_current(&mut self) -> Result<Option<Box<dyn RecordReader>>> {
        let Some(path) = self.plan.filenames.get(self.file_index) else {
            return Ok(None);
        };
        tracing::debug!(
            "Opening {} file {} ({}/{})",
            self.plan.kind.name(),
            path.display(),
            self.file_index + 1,
            self.plan.filenames.len()
        );
        self.records_in_file = 0;
        match self.plan.kind.open(path, &self.plan.options) {
            Ok(reader) => Ok(Some(reader)),
            Err(e) => {
                self.file_index += 1;
                Err(e)
            }
        }
    }

    fn close(&mut self, reader: Box<dyn RecordReader>) {
        tracing::debug!(
            "Closing {} after {} records",
            reader.path().display(),
            self.records_in_file
        );
        self.file_index += 1;
    }
}

impl Cursor for SourceCursor {
    fn next_element(&mut self) -> Result<Option<Value>> {
        loop {
            let mut reader = match self.reader.take() {
                Some(reader) => reader,
                None => match self.open_current()? {
                    Some(reader) => reader,
                    None => return Ok(None),
                },
            };

            match reader.read_record() {
                Ok(Some(record)) => {
                    self.records_in_file += 1;
                    self.reader = Some(reader);
                    return Ok(Some(Value::Bytes(record)));
                }
                Ok(None) => self.close(reader),
                Err(e) => {
                    // The rest of a corrupt file is skipped.
                    self.close(reader);
                    return Err(e);
                }
            }
        }
    }
}
