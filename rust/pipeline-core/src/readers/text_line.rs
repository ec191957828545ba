// rust/pipeline-core/src/readers/text_line.rs

use std::path::Path;

use bytes::Bytes;

use super::RecordReader;
use crate::error::Result;
use crate::io::ByteSource;

/// Newline-delimited records.
///
/// Lines end at `\n` or `\r\n`; the terminator is stripped. A final line
/// without a terminator is still a record, and a file ending exactly at a
/// terminator yields no trailing empty record.
pub struct TextLineReader {
    source: ByteSource,
    line: Vec<u8>,
}

impl TextLineReader {
    pub fn new(source: ByteSource) -> Self {
        Self {
            source,
            line: Vec::new(),
        }
    }
}

impl RecordReader for TextLineReader {
    fn read_record(&mut self) -> Result<Option<Bytes>> {
        self.line.clear();
        if self.source.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }

        if self.line.last() == Some(&b'\n') {
            self.line.pop();
            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
        }

        Ok(Some(Bytes::copy_from_slice(&self.line)))
    }

    fn path(&self) -> &Path {
        self.source.path()
    }

    fn name(&self) -> &'static str {
        "text-line"
    }
}
