// rust/pipeline-core/src/readers/fixed_length.rs

use std::path::Path;

use bytes::{Bytes, BytesMut};

use super::RecordReader;
use crate::error::{PipelineError, Result};
use crate::io::ByteSource;

/// Checks that a file of `size` bytes holds a whole number of records
/// between its header and footer.
pub(crate) fn check_layout(
    path: &Path,
    size: u64,
    record_bytes: u64,
    header_bytes: u64,
    footer_bytes: u64,
) -> Result<()> {
    let framing = header_bytes + footer_bytes;
    if size < framing || (size - framing) % record_bytes != 0 {
        return Err(PipelineError::invalid_argument(format!(
            "file '{}' has size {size}, which is not header_bytes ({header_bytes}) + \
             footer_bytes ({footer_bytes}) + a multiple of record_bytes ({record_bytes})",
            path.display()
        )));
    }
    Ok(())
}

/// Fixed-size records between a skipped header and footer.
///
/// The reader keeps `record_bytes + footer_bytes` bytes of look-ahead, so a
/// record is only emitted once it is known not to overlap the footer. This
/// works the same for compressed streams whose size is unknown up front.
pub struct FixedLengthRecordReader {
    source: ByteSource,
    record_bytes: usize,
    header_bytes: u64,
    footer_bytes: usize,
    pending: BytesMut,
    header_skipped: bool,
    finished: bool,
}

impl FixedLengthRecordReader {
    /// Creates a reader. `record_bytes` must be positive.
    pub fn new(
        source: ByteSource,
        record_bytes: u64,
        header_bytes: u64,
        footer_bytes: u64,
    ) -> Result<Self> {
        if record_bytes == 0 {
            return Err(PipelineError::invalid_argument(
                "record_bytes must be greater than 0",
            ));
        }
        let record_bytes = usize::try_from(record_bytes)
            .map_err(|e| PipelineError::invalid_argument_with_source("record_bytes too large", e))?;
        let footer_bytes = usize::try_from(footer_bytes)
            .map_err(|e| PipelineError::invalid_argument_with_source("footer_bytes too large", e))?;
        if record_bytes.checked_add(footer_bytes).is_none() {
            return Err(PipelineError::invalid_argument(
                "record_bytes + footer_bytes overflows",
            ));
        }

        Ok(Self {
            source,
            record_bytes,
            header_bytes,
            footer_bytes,
            pending: BytesMut::new(),
            header_skipped: false,
            finished: false,
        })
    }

    fn layout_error(&self, trailing: usize) -> PipelineError {
        PipelineError::invalid_argument(format!(
            "file '{}' ends with {trailing} bytes after the last whole record, expected \
             footer_bytes ({}); its size is not header_bytes + footer_bytes + a multiple \
             of record_bytes ({})",
            self.source.path().display(),
            self.footer_bytes,
            self.record_bytes
        ))
    }
}

impl RecordReader for FixedLengthRecordReader {
    fn read_record(&mut self) -> Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }

        if !self.header_skipped {
            let skipped = self.source.skip(self.header_bytes)?;
            self.header_skipped = true;
            if skipped < self.header_bytes {
                self.finished = true;
                return Err(PipelineError::invalid_argument(format!(
                    "file '{}' is shorter than header_bytes ({})",
                    self.source.path().display(),
                    self.header_bytes
                )));
            }
        }

        let window = self.record_bytes + self.footer_bytes;
        self.source.fill_to(&mut self.pending, window)?;

        if self.pending.len() == window {
            return Ok(Some(self.pending.split_to(self.record_bytes).freeze()));
        }

        // End of stream: whatever is left must be exactly the footer.
        self.finished = true;
        if self.pending.len() == self.footer_bytes {
            self.pending.clear();
            Ok(None)
        } else {
            Err(self.layout_error(self.pending.len()))
        }
    }

    fn path(&self) -> &Path {
        self.source.path()
    }

    fn name(&self) -> &'static str {
        "fixed-length"
    }
}
