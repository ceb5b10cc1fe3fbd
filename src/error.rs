// In: src/error.rs

//! This module defines the single, unified error type for the entire dataframe library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, DataFrameError>;

#[derive(Error, Debug)]
pub enum DataFrameError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A value outside the domain of its column kind, or a structural table rule broken.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Malformed, truncated or unsupported wire data.
    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Index {index} out of bounds for length {length}")]
    Bounds { index: usize, length: usize },

    /// A value that cannot be represented in the requested target kind.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Unknown column kind with type code {0}")]
    UnknownColumnKind(u8),

    /// A count or length that does not fit the 32-bit fields of the wire format.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a `CodecConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// The coarse error taxonomy callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Format,
    Bounds,
    Conversion,
    Capacity,
    Config,
    Io,
    Internal,
}

impl DataFrameError {
    /// Maps a concrete error onto its category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Format(_) | Self::Base64(_) => ErrorCategory::Format,
            Self::Bounds { .. } => ErrorCategory::Bounds,
            Self::Conversion(_) | Self::UnknownColumnKind(_) => ErrorCategory::Conversion,
            Self::Capacity(_) => ErrorCategory::Capacity,
            Self::Config(_) | Self::SerdeJson(_) => ErrorCategory::Config,
            Self::Io(_) => ErrorCategory::Io,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }
}
