// rust/pipeline-core/src/io/compression.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Compression envelope around a file's bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompressionType {
    /// Raw file bytes.
    #[default]
    None,
    /// RFC 1952 gzip stream.
    Gzip,
    /// RFC 1950 zlib stream (header, deflate body, Adler-32 trailer).
    Zlib,
}

impl CompressionType {
    /// The name used in parameters and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Gzip => "GZIP",
            Self::Zlib => "ZLIB",
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for CompressionType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Self::None),
            "GZIP" => Ok(Self::Gzip),
            "ZLIB" => Ok(Self::Zlib),
            other => Err(PipelineError::invalid_argument(format!(
                "unsupported compression_type '{other}', expected one of: \"\", \"GZIP\", \"ZLIB\""
            ))),
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
