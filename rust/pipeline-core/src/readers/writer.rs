// rust/pipeline-core/src/readers/writer.rs

//! Writer for the framed record format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use super::framed::masked_crc32c;
use crate::error::{PipelineError, Result};
use crate::io::CompressionType;

/// Encodes one payload as a complete frame.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() as u64).to_le_bytes();
    let mut frame = Vec::with_capacity(payload.len() + 16);
    frame.extend_from_slice(&length);
    frame.extend_from_slice(&masked_crc32c(&length).to_le_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&masked_crc32c(payload).to_le_bytes());
    frame
}

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Zlib(ZlibEncoder<BufWriter<File>>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Plain(w) => w,
            Self::Gzip(w) => w,
            Self::Zlib(w) => w,
        }
    }

    fn finish(self) -> std::io::Result<BufWriter<File>> {
        match self {
            Self::Plain(w) => Ok(w),
            Self::Gzip(w) => w.finish(),
            Self::Zlib(w) => w.finish(),
        }
    }
}

/// Writes records as frames, optionally inside a GZIP or ZLIB envelope.
///
/// `finish` must be called to flush the compression trailer and sync the
/// file; a writer dropped without it may leave a truncated stream.
pub struct FramedRecordWriter {
    path: PathBuf,
    sink: Sink,
    records: u64,
}

impl FramedRecordWriter {
    /// Creates (or truncates) `path`.
    pub fn create(path: impl AsRef<Path>, compression: CompressionType) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| PipelineError::io_with_source(path, "failed to create file", e))?;
        let buffered = BufWriter::new(file);

        let sink = match compression {
            CompressionType::None => Sink::Plain(buffered),
            CompressionType::Gzip => Sink::Gzip(GzEncoder::new(buffered, Compression::default())),
            CompressionType::Zlib => Sink::Zlib(ZlibEncoder::new(buffered, Compression::default())),
        };

        Ok(Self {
            path: path.to_path_buf(),
            sink,
            records: 0,
        })
    }

    pub fn write_record(&mut self, payload: &[u8]) -> Result<()> {
        let frame = encode_frame(payload);
        self.sink
            .writer()
            .write_all(&frame)
            .map_err(|e| PipelineError::io_with_source(&self.path, "failed to write record", e))?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Flushes all data and syncs the file to disk.
    pub fn finish(self) -> Result<()> {
        let path = self.path;
        let mut buffered = self
            .sink
            .finish()
            .map_err(|e| PipelineError::io_with_source(&path, "failed to finish stream", e))?;
        buffered
            .flush()
            .map_err(|e| PipelineError::io_with_source(&path, "failed to flush writer", e))?;
        buffered
            .get_ref()
            .sync_all()
            .map_err(|e| PipelineError::io_with_source(&path, "failed to sync file to disk", e))?;
        Ok(())
    }
}
