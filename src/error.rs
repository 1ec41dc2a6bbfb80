//! Document-level failure type.
//!
//! Anything that makes a whole document unprocessable surfaces as a
//! [`ParsingError`]. Record-level anomalies never do; those are funneled into
//! [`Messages`](crate::diagnostics::Messages) instead.

use thiserror::Error;

/// Fatal errors raised while importing or exporting a BuildingSync document.
#[derive(Debug, Error)]
pub enum ParsingError {
    /// The document could not be parsed or serialized as XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error (batch input).
    #[error("Archive error: {0}")]
    Archive(String),

    /// Mapping or configuration document could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Root element is not the expected format identifier.
    #[error("Expected root element '{expected}', found '{found}'")]
    RootMismatch { expected: &'static str, found: String },

    /// No version could be determined from the document.
    #[error("Unable to determine BuildingSync version: {0}")]
    UnresolvedVersion(String),

    /// A version was found but it is not one we have a schema and mapping for.
    #[error("Unsupported BuildingSync version '{version}'. Supported versions: {}", .supported.join(", "))]
    UnsupportedVersion {
        version: String,
        supported: Vec<&'static str>,
    },

    /// The schema resource for a version could not be loaded.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid path expression in a mapping rule.
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// An operation was called before the state it depends on exists.
    #[error("Out of sequence: {0}")]
    OutOfSequence(String),
}

impl ParsingError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported version error listing the supported set.
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
            supported: crate::base::SUPPORTED_VERSIONS.to_vec(),
        }
    }
}
