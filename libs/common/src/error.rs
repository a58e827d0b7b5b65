//! Custom error types for the render service
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use thiserror::Error;

/// Custom error type for object storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage credentials are missing or incomplete
    #[error("S3 not configured: {0}")]
    Configuration(String),

    /// The object store rejected the put request
    #[error("S3 error: {0}")]
    UploadFailed(String),

    /// Catch-all for anything else the storage path can raise
    #[error("{0}")]
    Unexpected(String),
}

/// Custom error type for render operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// The external render tool exceeded its wall-clock budget
    #[error("Render timeout ({0} s)")]
    Timeout(u64),

    /// The external render tool reported or implied failure; the detail
    /// string is surfaced to the caller verbatim
    #[error("{0}")]
    Failed(String),

    /// Filesystem or process-spawn error around the render invocation
    #[error("Render I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for Result with RenderError
pub type RenderResult<T> = Result<T, RenderError>;
