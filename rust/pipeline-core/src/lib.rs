// rust/pipeline-core/src/lib.rs

//! Input Pipeline - Core Library
//!
//! This crate turns local files into lazily produced sequences of byte-string
//! records: newline-delimited text, fixed-length binary records and
//! checksummed frames, each optionally GZIP or ZLIB compressed. Datasets are
//! pure descriptions composed with repeat, batch and prefetch stages and
//! consumed through a re-initializable [`DatasetIterator`].

pub mod config;
pub mod error;
pub mod io;

// Re-export commonly used types for convenience
pub use config::{DatasetConfig, PipelineConfig, ReaderConfig};
pub use error::{ErrorKind, PipelineError, Result};
pub use io::{ByteSource, CompressionType, ReaderOptions};

pub mod readers;
pub use readers::{FramedRecordWriter, RecordReader, ReaderKind};

pub mod dataset;
pub use dataset::{
    Cursor, DType, Dataset, ElementSpec, Feed, Param, ParamValue, ReaderDataset, Value,
};

pub mod iterator;
pub use iterator::{DatasetIterator, IteratorStatus};
