//! Error types and handling for Webpify

use std::path::{Path, PathBuf};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for run-level Webpify operations
pub type Result<T> = std::result::Result<T, WebpifyError>;

/// Run-level errors. Any of these aborts the whole batch.
#[derive(Debug, Error)]
pub enum WebpifyError {
    /// The target directory could not be listed
    #[error("Cannot list directory {path:?}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),

    /// A blocking codec task could not be joined
    #[error("System resource error: {message}")]
    SystemError { message: String },

    /// Report lines could not be written
    #[error("Output error: {0}")]
    OutputError(#[from] std::io::Error),
}

impl WebpifyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new system error
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::SystemError {
            message: message.into(),
        }
    }

    /// Create a directory listing error
    pub fn list_directory(path: &Path, source: std::io::Error) -> Self {
        Self::ListDirectory {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for WebpifyError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for WebpifyError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

/// The stage of a single-file conversion that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionErrorKind {
    Open,
    Decode,
    Encode,
    Write,
    Stat,
    DestinationExists,
    RemoveSource,
}

/// Per-file conversion failure. The batch logs it and moves on.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("cannot open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot identify image file {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("WebP encoding failed for {}: {}", .path.display(), .message)]
    Encode { path: PathBuf, message: String },

    #[error("cannot write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read size of {}: {}", .path.display(), .source)]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} already exists", .path.display())]
    DestinationExists { path: PathBuf },

    #[error("converted, but cannot remove source {}: {}", .path.display(), .source)]
    RemoveSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Which stage failed
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            Self::Open { .. } => ConversionErrorKind::Open,
            Self::Decode { .. } => ConversionErrorKind::Decode,
            Self::Encode { .. } => ConversionErrorKind::Encode,
            Self::Write { .. } => ConversionErrorKind::Write,
            Self::Stat { .. } => ConversionErrorKind::Stat,
            Self::DestinationExists { .. } => ConversionErrorKind::DestinationExists,
            Self::RemoveSource { .. } => ConversionErrorKind::RemoveSource,
        }
    }

    /// The file the failure refers to
    pub fn file_path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. }
            | Self::Write { path, .. }
            | Self::Stat { path, .. }
            | Self::DestinationExists { path }
            | Self::RemoveSource { path, .. } => path,
        }
    }
}

/// I/O stages that can be attached to an `io::Result`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    Open,
    Write,
    Stat,
    RemoveSource,
}

/// Error context extension for tagging I/O failures with stage and path
pub trait ErrorContext<T> {
    /// Convert into a per-file conversion error for `file`
    fn with_file_context(self, stage: IoStage, file: &Path) -> std::result::Result<T, ConversionError>;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_file_context(self, stage: IoStage, file: &Path) -> std::result::Result<T, ConversionError> {
        self.map_err(|source| {
            let path = file.to_path_buf();
            match stage {
                IoStage::Open => ConversionError::Open { path, source },
                IoStage::Write => ConversionError::Write { path, source },
                IoStage::Stat => ConversionError::Stat { path, source },
                IoStage::RemoveSource => ConversionError::RemoveSource { path, source },
            }
        })
    }
}
