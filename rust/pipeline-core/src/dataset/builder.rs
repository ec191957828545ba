// rust/pipeline-core/src/dataset/builder.rs

use std::path::PathBuf;
use std::sync::Arc;

use super::cursor::Cursor;
use super::element::ElementSpec;
use super::params::{Feed, Param};
use super::plan::{Plan, SourcePlan};
use crate::config::{DatasetConfig, ReaderConfig};
use crate::error::{PipelineError, Result};
use crate::io::{CompressionType, ReaderOptions};
use crate::readers::ReaderKind;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Format {
    TextLine,
    FixedLength {
        record_bytes: Param<i64>,
        header_bytes: Param<i64>,
        footer_bytes: Param<i64>,
    },
    Framed,
}

/// A source dataset: one record format over an ordered list of files.
///
/// Every reader parameter may be a placeholder resolved at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderDataset {
    format: Format,
    filenames: Param<Vec<String>>,
    compression_type: Param<String>,
    buffer_size: Param<i64>,
    use_mmap: bool,
    mmap_threshold: u64,
}

impl ReaderDataset {
    fn new(format: Format, filenames: Param<Vec<String>>) -> Self {
        let defaults = ReaderConfig::default();
        Self {
            format,
            filenames,
            compression_type: Param::Value(defaults.compression_type),
            buffer_size: Param::Value(buffer_size_param(defaults.buffer_size)),
            use_mmap: defaults.use_mmap,
            mmap_threshold: defaults.mmap_threshold,
        }
    }

    /// Lines terminated by `\n` or `\r\n`.
    pub fn text_line(filenames: impl Into<Param<Vec<String>>>) -> Self {
        Self::new(Format::TextLine, filenames.into())
    }

    /// Records of `record_bytes` between a header and footer of fixed size.
    pub fn fixed_length(
        filenames: impl Into<Param<Vec<String>>>,
        record_bytes: impl Into<Param<i64>>,
        header_bytes: impl Into<Param<i64>>,
        footer_bytes: impl Into<Param<i64>>,
    ) -> Self {
        Self::new(
            Format::FixedLength {
                record_bytes: record_bytes.into(),
                header_bytes: header_bytes.into(),
                footer_bytes: footer_bytes.into(),
            },
            filenames.into(),
        )
    }

    /// Length-prefixed frames with masked CRC-32C checksums.
    pub fn framed(filenames: impl Into<Param<Vec<String>>>) -> Self {
        Self::new(Format::Framed, filenames.into())
    }

    /// `""`, `"GZIP"` or `"ZLIB"`.
    #[must_use]
    pub fn compression_type(mut self, compression_type: impl Into<Param<String>>) -> Self {
        self.compression_type = compression_type.into();
        self
    }

    /// Read-ahead buffer size in bytes; must be positive.
    #[must_use]
    pub fn buffer_size(mut self, buffer_size: impl Into<Param<i64>>) -> Self {
        self.buffer_size = buffer_size.into();
        self
    }

    /// Uses a configuration section for compression, buffering and mmap.
    #[must_use]
    pub fn with_reader_config(mut self, config: &ReaderConfig) -> Self {
        self.compression_type = Param::Value(config.compression_type.clone());
        self.buffer_size = Param::Value(buffer_size_param(config.buffer_size));
        self.use_mmap = config.use_mmap;
        self.mmap_threshold = config.mmap_threshold;
        self
    }

    pub fn into_dataset(self) -> Dataset {
        Dataset {
            node: Node::Source(self),
        }
    }

    pub fn repeat(self, count: impl Into<Param<i64>>) -> Dataset {
        self.into_dataset().repeat(count)
    }

    pub fn batch(self, batch_size: impl Into<Param<i64>>) -> Dataset {
        self.into_dataset().batch(batch_size)
    }

    pub fn prefetch(self, buffer_size: impl Into<Param<i64>>) -> Dataset {
        self.into_dataset().prefetch(buffer_size)
    }

    fn resolve(&self, feed: &Feed) -> Result<Arc<SourcePlan>> {
        let kind = match &self.format {
            Format::TextLine => ReaderKind::TextLine,
            Format::FixedLength {
                record_bytes,
                header_bytes,
                footer_bytes,
            } => {
                let record_bytes = record_bytes.resolve(feed)?;
                if record_bytes <= 0 {
                    return Err(PipelineError::invalid_argument(format!(
                        "record_bytes must be greater than 0, got {record_bytes}"
                    )));
                }
                ReaderKind::FixedLength {
                    record_bytes: record_bytes.unsigned_abs(),
                    header_bytes: non_negative("header_bytes", header_bytes.resolve(feed)?)?,
                    footer_bytes: non_negative("footer_bytes", footer_bytes.resolve(feed)?)?,
                }
            }
            Format::Framed => ReaderKind::Framed,
        };

        let compression: CompressionType = self.compression_type.resolve(feed)?.parse()?;
        let buffer_size = self.buffer_size.resolve(feed)?;
        if buffer_size <= 0 {
            return Err(PipelineError::invalid_argument(format!(
                "buffer_size must be greater than 0, got {buffer_size}"
            )));
        }
        let buffer_size = usize::try_from(buffer_size)
            .map_err(|e| PipelineError::invalid_argument_with_source("buffer_size too large", e))?;

        let options = ReaderOptions {
            compression,
            buffer_size,
            use_mmap: self.use_mmap,
            mmap_threshold: self.mmap_threshold,
        };
        options.validate()?;

        let filenames: Vec<PathBuf> = self
            .filenames
            .resolve(feed)?
            .into_iter()
            .map(PathBuf::from)
            .collect();
        for path in &filenames {
            kind.precheck(path, &options)?;
        }

        Ok(Arc::new(SourcePlan {
            kind,
            filenames,
            options,
        }))
    }
}

impl From<ReaderDataset> for Dataset {
    fn from(source: ReaderDataset) -> Self {
        source.into_dataset()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Source(ReaderDataset),
    Repeat {
        input: Box<Dataset>,
        count: Param<i64>,
    },
    Batch {
        input: Box<Dataset>,
        batch_size: Param<i64>,
    },
    Prefetch {
        input: Box<Dataset>,
        buffer_size: Param<i64>,
    },
}

/// An immutable description of a record pipeline.
///
/// Nothing is opened or read until [`Dataset::build`]; the same description
/// can be built any number of times with different [`Feed`]s. Composition
/// consumes the input description.
///
/// ```no_run
/// use pipeline_core::dataset::{Cursor, Feed, Param, ReaderDataset};
///
/// let dataset = ReaderDataset::text_line(Param::placeholder("filenames"))
///     .repeat(Param::placeholder_with_default("num_epochs", 1))
///     .batch(32);
/// let feed = Feed::new().with("filenames", vec!["a.txt", "b.txt"]);
/// let mut cursor = dataset.build(&feed).unwrap();
/// while let Some(batch) = cursor.next_element().unwrap() {
///     // Process batch
/// #   let _ = batch;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    node: Node,
}

impl Dataset {
    /// Repeats the input `count` times; a negative count repeats forever.
    #[must_use]
    pub fn repeat(self, count: impl Into<Param<i64>>) -> Self {
        Self {
            node: Node::Repeat {
                input: Box::new(self),
                count: count.into(),
            },
        }
    }

    /// Groups elements into batches of `batch_size`; the last may be shorter.
    #[must_use]
    pub fn batch(self, batch_size: impl Into<Param<i64>>) -> Self {
        Self {
            node: Node::Batch {
                input: Box::new(self),
                batch_size: batch_size.into(),
            },
        }
    }

    /// Reads up to `buffer_size` elements ahead on a background thread.
    /// Zero disables prefetching.
    #[must_use]
    pub fn prefetch(self, buffer_size: impl Into<Param<i64>>) -> Self {
        Self {
            node: Node::Prefetch {
                input: Box::new(self),
                buffer_size: buffer_size.into(),
            },
        }
    }

    /// Applies dataset-level configuration.
    #[must_use]
    pub fn with_dataset_config(self, config: &DatasetConfig) -> Self {
        if config.prefetch_elements == 0 {
            return self;
        }
        let buffer_size = i64::try_from(config.prefetch_elements).unwrap_or(i64::MAX);
        self.prefetch(buffer_size)
    }

    /// Type and shape of the elements this dataset produces.
    pub fn output_signature(&self) -> ElementSpec {
        match &self.node {
            Node::Source(_) => ElementSpec::record(),
            Node::Repeat { input, .. } | Node::Prefetch { input, .. } => input.output_signature(),
            Node::Batch { input, .. } => {
                let inner = input.output_signature();
                ElementSpec::new(inner.dtype, inner.shape.prepend(None))
            }
        }
    }

    /// Resolves every parameter against `feed` and returns a cursor at the
    /// start of the sequence.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for missing or mistyped parameters, a
    ///   non-positive batch or buffer size, an unknown compression type, or
    ///   an uncompressed fixed-length file whose size does not fit the layout
    /// - `NotFound` for a missing uncompressed fixed-length file
    pub fn build(&self, feed: &Feed) -> Result<Box<dyn Cursor>> {
        self.resolve(feed)?.open()
    }

    fn resolve(&self, feed: &Feed) -> Result<Plan> {
        Ok(match &self.node {
            Node::Source(source) => Plan::Source(source.resolve(feed)?),
            Node::Repeat { input, count } => {
                let count = count.resolve(feed)?;
                Plan::Repeat {
                    input: Box::new(input.resolve(feed)?),
                    count: u64::try_from(count).ok(),
                }
            }
            Node::Batch { input, batch_size } => {
                let batch_size = batch_size.resolve(feed)?;
                if batch_size <= 0 {
                    return Err(PipelineError::invalid_argument(format!(
                        "batch_size must be greater than 0, got {batch_size}"
                    )));
                }
                Plan::Batch {
                    input: Box::new(input.resolve(feed)?),
                    batch_size: usize::try_from(batch_size).map_err(|e| {
                        PipelineError::invalid_argument_with_source("batch_size too large", e)
                    })?,
                }
            }
            Node::Prefetch { input, buffer_size } => {
                let buffer_size = non_negative("prefetch buffer_size", buffer_size.resolve(feed)?)?;
                let input = input.resolve(feed)?;
                if buffer_size == 0 {
                    input
                } else {
                    Plan::Prefetch {
                        input: Box::new(input),
                        buffer_size: usize::try_from(buffer_size).map_err(|e| {
                            PipelineError::invalid_argument_with_source(
                                "prefetch buffer_size too large",
                                e,
                            )
                        })?,
                    }
                }
            }
        })
    }
}

fn non_negative(name: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        PipelineError::invalid_argument(format!("{name} must not be negative, got {value}"))
    })
}

fn buffer_size_param(buffer_size: usize) -> i64 {
    i64::try_from(buffer_size).unwrap_or(i64::MAX)
}
