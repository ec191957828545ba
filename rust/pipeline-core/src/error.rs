// rust/pipeline-core/src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`PipelineError`].
///
/// Callers loop on `get_next()` until they see [`ErrorKind::OutOfRange`];
/// every other kind is a genuine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfRange,
    InvalidArgument,
    NotFound,
    DataLoss,
    FailedPrecondition,
    Unknown,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// End of sequence. Not a failure.
    #[error("End of sequence: {message}")]
    OutOfRange { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Not found '{path}': {message}")]
    NotFound {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Data loss in '{path}': {message}")]
    DataLoss {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Failed precondition: {message}")]
    FailedPrecondition { message: String },

    #[error("I/O error at '{path}': {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<io::Error>,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

// Convenience constructors
impl PipelineError {
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_argument_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn not_found_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::NotFound {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn data_loss(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DataLoss {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn data_loss_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::DataLoss {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::FailedPrecondition {
            message: message.into(),
        }
    }

    pub fn io_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn internal_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Maps an error raised while opening `path`.
    pub fn from_open_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                Self::not_found_with_source(path, "failed to open file", source)
            }
            _ => Self::io_with_source(path, "failed to open file", source),
        }
    }

    /// Maps an error raised while reading from `path`. Malformed input
    /// detected by a decoder becomes `DataLoss`.
    pub fn from_read_error(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        match source.kind() {
            io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof => Self::data_loss_with_source(path, message, source),
            _ => Self::io_with_source(path, message, source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DataLoss { .. } => ErrorKind::DataLoss,
            Self::FailedPrecondition { .. } => ErrorKind::FailedPrecondition,
            Self::Io { .. } | Self::Internal { .. } => ErrorKind::Unknown,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        self.kind() == ErrorKind::OutOfRange
    }
}
