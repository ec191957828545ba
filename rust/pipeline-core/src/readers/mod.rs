// rust/pipeline-core/src/readers/mod.rs

//! Record readers.
//!
//! Each reader turns one [`ByteSource`] into a lazy sequence of byte-string
//! records. The three on-disk formats are:
//!
//! - text lines terminated by `\n` or `\r\n` ([`TextLineReader`]),
//! - fixed-length records between a skipped header and footer
//!   ([`FixedLengthRecordReader`]),
//! - length-prefixed, CRC-32C protected frames ([`FramedRecordReader`]).
//!
//! [`ReaderKind`] selects one of them; the dataset layer is written once
//! against [`RecordReader`] and never looks at the format.

mod fixed_length;
mod framed;
mod text_line;
mod writer;

pub use fixed_length::FixedLengthRecordReader;
pub use framed::{masked_crc32c, unmask_crc, FramedRecordReader, FRAME_HEADER_LEN};
pub use text_line::TextLineReader;
pub use writer::{encode_frame, FramedRecordWriter};

use std::path::Path;

use bytes::Bytes;

use crate::error::{PipelineError, Result};
use crate::io::{ByteSource, ReaderOptions};

/// Produces records from one file.
pub trait RecordReader: Send {
    /// Reads the next record. Returns `Ok(None)` at a clean end of file.
    fn read_record(&mut self) -> Result<Option<Bytes>>;

    /// Path of the file being read.
    fn path(&self) -> &Path;

    /// Name of this record format.
    fn name(&self) -> &'static str;
}

/// The on-disk record format of a source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    TextLine,
    FixedLength {
        record_bytes: u64,
        header_bytes: u64,
        footer_bytes: u64,
    },
    Framed,
}

impl ReaderKind {
    /// Opens `path` and wraps it in the matching reader.
    pub fn open(&self, path: &Path, options: &ReaderOptions) -> Result<Box<dyn RecordReader>> {
        let source = ByteSource::open(path, options)?;
        let reader: Box<dyn RecordReader> = match *self {
            Self::TextLine => Box::new(TextLineReader::new(source)),
            Self::FixedLength {
                record_bytes,
                header_bytes,
                footer_bytes,
            } => Box::new(FixedLengthRecordReader::new(
                source,
                record_bytes,
                header_bytes,
                footer_bytes,
            )?),
            Self::Framed => Box::new(FramedRecordReader::new(source)),
        };
        Ok(reader)
    }

    /// Checks a file before reading starts, where the format allows it.
    ///
    /// Uncompressed fixed-length files are sized with a metadata lookup so
    /// that a non-dividing layout is reported before the first record.
    pub fn precheck(&self, path: &Path, options: &ReaderOptions) -> Result<()> {
        match *self {
            Self::FixedLength {
                record_bytes,
                header_bytes,
                footer_bytes,
            } if !options.compression.is_compressed() => {
                let size = std::fs::metadata(path)
                    .map_err(|e| PipelineError::from_open_error(path, e))?
                    .len();
                fixed_length::check_layout(path, size, record_bytes, header_bytes, footer_bytes)
            }
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TextLine => "text-line",
            Self::FixedLength { .. } => "fixed-length",
            Self::Framed => "framed",
        }
    }
}
