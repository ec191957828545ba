// rust/pipeline-core/src/io/mod.rs

//! Byte-level input for the record readers.
//!
//! A [`ByteSource`] wraps one local file, optionally memory-mapped, behind a
//! read-ahead buffer and an optional GZIP/ZLIB decompression envelope. The
//! buffer size only changes how often the underlying file is touched; the
//! byte stream seen by the readers is identical for every buffer size.
//!
//! # Example
//!
//! ```no_run
//! use pipeline_core::io::{ByteSource, CompressionType, ReaderOptions};
//!
//! let options = ReaderOptions::default()
//!     .with_compression(CompressionType::Gzip)
//!     .with_buffer_size(10);
//! let mut source = ByteSource::open("lines.txt.gz", &options).unwrap();
//! while let Some(chunk) = source.read_chunk(4096).unwrap() {
//!     // Process chunk
//! #   let _ = chunk;
//! }
//! ```

mod byte_source;
mod compression;

pub use byte_source::{ByteSource, ReaderOptions};
pub use compression::CompressionType;
