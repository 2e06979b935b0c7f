//! Error types for invoice-core.
//!
//! Most failures in this crate are recovered locally (bad numbers become 0,
//! bad dates pass through, bad logos are skipped). The types here cover what
//! is left: sink I/O during export, boundary validation before export, and
//! adapter failures.

use thiserror::Error;

/// Failure while producing a PDF export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output sink rejected a write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure decoding an embedded image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The logo string is not a `data:` URI.
    #[error("not a data URI")]
    NotDataUri,

    /// The data URI payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(String),

    /// Magic bytes match neither JPEG nor PNG.
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,

    /// JPEG structure could not be read.
    #[error("JPEG error: {0}")]
    Jpeg(String),

    /// PNG decoding failed.
    #[error("PNG error: {0}")]
    Png(String),
}

/// A document is not complete enough to leave the form.
///
/// The display strings are the notices shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sender name is required")]
    MissingSenderName,

    #[error("client name is required")]
    MissingClientName,

    #[error("at least one line item is required")]
    NoItems,
}

/// Failure reported by a persistence adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage is not reachable (e.g. disabled in the browser).
    #[error("storage unavailable")]
    Unavailable,

    /// The backing storage refused the write.
    #[error("storage write failed: {0}")]
    Write(String),

    /// The document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Why a document could not move on to theme selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContinueError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A theme id that names no theme.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);
