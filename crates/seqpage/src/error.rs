//! Error types for sequence stores and page creation.
//!
//! This module defines the central `Error` enum, which captures every failure
//! a [`SequenceStore`](crate::SequenceStore) can report. The page-creation
//! service does not distinguish between these cases when answering a caller:
//! every variant collapses into a failure result carrying its `Display` text.
//!
//! ## Error Cases
//! - `Http`: The request never produced a response (DNS, TLS, connection
//!   reset, ...).
//! - `Api`: The remote service answered with a non-success status.
//! - `InvalidSequence`: The highest record has no usable sequence value.
//! - `Decode`: A response body could not be decoded.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for sequence stores.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport failure while talking to the remote service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service rejected the request.
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The top record's sequence property is missing, null, or not an
    /// integer.
    #[error("Invalid sequence value: {reason}")]
    InvalidSequence { reason: String },

    /// A response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
