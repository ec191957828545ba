// rust/pipeline-core/src/config.rs

//! Configuration management for the input pipeline.
//!
//! This module provides configuration parsing from TOML files, environment
//! variable overrides, and validation of configuration values. The values
//! here are defaults; every reader parameter can still be overridden per
//! dataset or fed at `initialize` time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{PipelineError, Result};
use crate::io::CompressionType;

// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reader: ReaderConfig,
    pub dataset: DatasetConfig,
}

/// Record reader defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    // Read-ahead buffer size in bytes.
    pub buffer_size: usize,
    /// Compression envelope: "" (none), "GZIP" or "ZLIB".
    pub compression_type: String,
    // Whether to memory-map large uncompressed files.
    pub use_mmap: bool,
    // File size threshold (bytes) above which to use mmap.
    pub mmap_threshold: u64,
}

/// Dataset-level defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    // Number of elements to prefetch on a background thread (0 disables).
    pub prefetch_elements: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256 * 1024, // 256 KB
            compression_type: String::new(),
            use_mmap: false,
            mmap_threshold: 1024 * 1024, // 1 MB
        }
    }
}

impl FromStr for PipelineConfig {
    type Err = PipelineError;

    /// Parse configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| {
            PipelineError::invalid_argument_with_source("failed to parse TOML config", e)
        })
    }
}

impl PipelineConfig {
    // Load configuration from a TOML file.
    //
    // # Errors
    //
    // Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::from_open_error(path, e))?;
        let config: Self = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    // Apply environment variable overrides.
    //
    // Environment variables are prefixed with `PIPELINE_` and use
    // underscores to separate nested fields. For example:
    // - `PIPELINE_READER_BUFFER_SIZE` overrides `reader.buffer_size`
    // - `PIPELINE_READER_COMPRESSION_TYPE` overrides `reader.compression_type`
    // - `PIPELINE_DATASET_PREFETCH_ELEMENTS` overrides `dataset.prefetch_elements`
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        // Reader overrides
        if let Ok(val) = std::env::var("PIPELINE_READER_BUFFER_SIZE") {
            if let Ok(v) = val.parse() {
                self.reader.buffer_size = v;
            }
        }
        if let Ok(val) = std::env::var("PIPELINE_READER_COMPRESSION_TYPE") {
            self.reader.compression_type = val;
        }
        if let Ok(val) = std::env::var("PIPELINE_READER_USE_MMAP") {
            if let Ok(v) = val.parse() {
                self.reader.use_mmap = v;
            }
        }
        if let Ok(val) = std::env::var("PIPELINE_READER_MMAP_THRESHOLD") {
            if let Ok(v) = val.parse() {
                self.reader.mmap_threshold = v;
            }
        }

        // Dataset overrides
        if let Ok(val) = std::env::var("PIPELINE_DATASET_PREFETCH_ELEMENTS") {
            if let Ok(v) = val.parse() {
                self.dataset.prefetch_elements = v;
            }
        }

        self
    }

    // Validate all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.reader.buffer_size == 0 {
            return Err(PipelineError::invalid_argument(
                "reader.buffer_size must be greater than 0",
            ));
        }

        self.reader.compression_type.parse::<CompressionType>()?;

        Ok(())
    }
}
