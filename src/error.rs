//! Library error types.
//!
//! Every fallible operation in the crate returns [`Result`]. The binary
//! converts these into `anyhow` errors at its edge.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum covering I/O, codec and validation failures
//! - [`ConfigError`](crate::config::ConfigError) stays separate since config
//!   loading never fails an operation
//! - [`ResultExt`] attaches human context to any fallible step
//!
//! # Example
//!
//! ```ignore
//! use unitag::error::{Error, Result, ResultExt};
//!
//! fn title(path: &Path) -> Result<Option<UnifiedValue>> {
//!     unitag::get_specific_metadata(path, UnifiedKey::Title, None, &ReadOptions::default())
//!         .with_context("while reading title")
//! }
//! ```

use std::path::PathBuf;

use crate::model::{TagFormat, UnifiedKey, ValueKind};

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying tag codec rejected the file or the tag
    #[error("Tag codec error for {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The file's container, or the requested format, is not handled for this file
    #[error("File type not supported: {0}")]
    FileTypeNotSupported(String),

    /// The key has no native field in the given format
    #[error("Metadata {key} is not supported by {format}")]
    MetadataNotSupported { key: UnifiedKey, format: TagFormat },

    /// A value of the wrong shape was supplied for a key
    #[error("Invalid value type for {key}: expected {expected}")]
    InvalidMetadataType { key: UnifiedKey, expected: ValueKind },

    /// The value has the right shape but cannot be stored
    #[error("Invalid value for {key}: {message}")]
    InvalidMetadataValue { key: UnifiedKey, message: String },

    /// Write attempted against a format this crate only reads
    #[error("{0} is read-only")]
    ReadOnlyFormat(TagFormat),

    /// Unknown unified key name
    #[error("Unknown metadata key: {0}")]
    UnknownKey(String),

    /// Unknown tag format name
    #[error("Unknown tag format: {0}")]
    UnknownFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a codec error.
    pub fn codec(path: impl Into<PathBuf>, source: lofty::error::LoftyError) -> Self {
        Self::Codec {
            path: path.into(),
            source,
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a file type error.
    pub fn file_type(message: impl Into<String>) -> Self {
        Self::FileTypeNotSupported(message.into())
    }

    /// Create an unsupported key error.
    pub fn unsupported(key: UnifiedKey, format: TagFormat) -> Self {
        Self::MetadataNotSupported { key, format }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: UnifiedKey, message: impl Into<String>) -> Self {
        Self::InvalidMetadataValue {
            key,
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
