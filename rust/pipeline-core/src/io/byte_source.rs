// rust/pipeline-core/src/io/byte_source.rs

//! Buffered, optionally decompressed, view over one local file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use flate2::bufread::{MultiGzDecoder, ZlibDecoder};
use memmap2::Mmap;

use super::compression::CompressionType;
use crate::config::ReaderConfig;
use crate::error::{ErrorKind, PipelineError, Result};

/// Concrete options for opening a [`ByteSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Compression envelope of every file.
    pub compression: CompressionType,
    /// Read-ahead buffer size in bytes. Also used for the decompressed side.
    pub buffer_size: usize,
    /// Whether to memory-map large files instead of issuing `read` calls.
    pub use_mmap: bool,
    /// File size threshold above which to use mmap.
    pub mmap_threshold: u64,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::None,
            buffer_size: 256 * 1024,
            use_mmap: false,
            mmap_threshold: 1024 * 1024,
        }
    }
}

impl ReaderOptions {
    /// Builds options from a configuration section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown compression name or a zero
    /// buffer size.
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        let options = Self {
            compression: config.compression_type.parse()?,
            buffer_size: config.buffer_size,
            use_mmap: config.use_mmap,
            mmap_threshold: config.mmap_threshold,
        };
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub fn with_mmap(mut self, mmap_threshold: u64) -> Self {
        self.use_mmap = true;
        self.mmap_threshold = mmap_threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(PipelineError::invalid_argument(
                "buffer_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Counts calls into the underlying file or mapping.
struct CountingReader<R> {
    inner: R,
    calls: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.read(buf)
    }
}

/// A stream of bytes from one file.
///
/// The file handle is owned exclusively by the source and is closed when the
/// source is dropped.
pub struct ByteSource {
    reader: Box<dyn BufRead + Send>,
    state: SourceState,
    io_calls: Arc<AtomicU64>,
}

/// Path and progress of a source, kept apart from its reader.
#[derive(Debug)]
struct SourceState {
    path: PathBuf,
    compression: CompressionType,
    position: u64,
}

impl SourceState {
    fn read_error(&self, message: &str, source: io::Error) -> PipelineError {
        let err = PipelineError::from_read_error(
            &self.path,
            format!("{message} at offset {}", self.position),
            source,
        );
        if self.compression.is_compressed() && err.kind() == ErrorKind::DataLoss {
            tracing::warn!(
                "Corrupt {} stream in {}: {}",
                self.compression,
                self.path.display(),
                err
            );
        }
        err
    }
}

impl ByteSource {
    /// Opens `path` for reading with the given options.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist or cannot be opened,
    /// and `InvalidArgument` if the options are invalid.
    pub fn open(path: impl AsRef<Path>, options: &ReaderOptions) -> Result<Self> {
        options.validate()?;

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::from_open_error(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| PipelineError::io_with_source(path, "failed to read file metadata", e))?
            .len();

        // Use mmap for large files if enabled
        let use_mmap = options.use_mmap && size > 0 && size >= options.mmap_threshold;
        let raw: Box<dyn Read + Send> = if use_mmap {
            // SAFETY: The file is opened read-only and the mapping is owned by
            // this source for its whole lifetime.
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| PipelineError::io_with_source(path, "failed to memory-map file", e))?;
            Box::new(io::Cursor::new(mmap))
        } else {
            Box::new(file)
        };

        let io_calls = Arc::new(AtomicU64::new(0));
        let counted = CountingReader {
            inner: raw,
            calls: io_calls.clone(),
        };
        let buffered = BufReader::with_capacity(options.buffer_size, counted);

        let reader: Box<dyn BufRead + Send> = match options.compression {
            CompressionType::None => Box::new(buffered),
            CompressionType::Gzip => Box::new(BufReader::with_capacity(
                options.buffer_size,
                MultiGzDecoder::new(buffered),
            )),
            CompressionType::Zlib => Box::new(BufReader::with_capacity(
                options.buffer_size,
                ZlibDecoder::new(buffered),
            )),
        };

        Ok(Self {
            reader,
            state: SourceState {
                path: path.to_path_buf(),
                compression: options.compression,
                position: 0,
            },
            io_calls,
        })
    }

    /// Reads up to `max_bytes` bytes. Returns `None` at end of stream.
    pub fn read_chunk(&mut self, max_bytes: usize) -> Result<Option<Bytes>> {
        if max_bytes == 0 {
            return Ok(Some(Bytes::new()));
        }

        let available = self
            .reader
            .fill_buf()
            .map_err(|e| self.state.read_error("failed to read", e))?;
        if available.is_empty() {
            return Ok(None);
        }

        let take = available.len().min(max_bytes);
        let chunk = Bytes::copy_from_slice(&available[..take]);
        self.reader.consume(take);
        self.state.position += take as u64;
        Ok(Some(chunk))
    }

    /// Appends bytes up to and including `delimiter` (or end of stream) to
    /// `buf`. Returns the number of bytes appended; zero means end of stream.
    pub fn read_until(&mut self, delimiter: u8, buf: &mut Vec<u8>) -> Result<usize> {
        let n = self
            .reader
            .read_until(delimiter, buf)
            .map_err(|e| self.state.read_error("failed to read line", e))?;
        self.state.position += n as u64;
        Ok(n)
    }

    /// Fills `buf` completely unless the stream ends first. Returns the
    /// number of bytes written, which is less than `buf.len()` only at end
    /// of stream.
    pub fn read_full(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.state.read_error("failed to read", e)),
            }
        }
        self.state.position += filled as u64;
        Ok(filled)
    }

    /// Reads at most `len` bytes into a new buffer.
    pub fn read_up_to(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = (&mut self.reader)
            .take(len)
            .read_to_end(&mut buf)
            .map_err(|e| self.state.read_error("failed to read", e))?;
        self.state.position += n as u64;
        Ok(buf)
    }

    /// Grows `buf` to `target_len` bytes unless the stream ends first.
    pub fn fill_to(&mut self, buf: &mut BytesMut, target_len: usize) -> Result<()> {
        while buf.len() < target_len {
            let available = self
                .reader
                .fill_buf()
                .map_err(|e| self.state.read_error("failed to read", e))?;
            if available.is_empty() {
                break;
            }
            let take = available.len().min(target_len - buf.len());
            buf.extend_from_slice(&available[..take]);
            self.reader.consume(take);
            self.state.position += take as u64;
        }
        Ok(())
    }

    /// Discards up to `n` bytes. Returns how many were skipped.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let skipped = io::copy(&mut (&mut self.reader).take(n), &mut io::sink())
            .map_err(|e| self.state.read_error("failed to skip", e))?;
        self.state.position += skipped;
        Ok(skipped)
    }

    /// Number of (decompressed) bytes delivered so far.
    pub fn position(&self) -> u64 {
        self.state.position
    }

    /// Number of read calls issued against the underlying file or mapping.
    pub fn io_calls(&self) -> u64 {
        self.io_calls.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn compression(&self) -> CompressionType {
        self.state.compression
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteSource")
            .field("path", &self.state.path)
            .field("compression", &self.state.compression)
            .field("position", &self.state.position)
            .finish()
    }
}
