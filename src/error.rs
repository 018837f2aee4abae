//! Error types for syncframe.

use std::time::Duration;

use thiserror::Error;

/// Main error type for driver lifecycle and I/O operations.
///
/// Per-frame problems (garbage, undecodable frames) are not errors here;
/// they are reported through [`SyncEvent`](crate::SyncEvent).
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid configuration (empty marker, buffer too small, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The working buffer could not be allocated.
    #[error("Failed to allocate working buffer of {requested} bytes")]
    Allocation { requested: usize },

    /// The decoder failed to allocate its own resources at start.
    #[error("Decoder initialization failed: {0}")]
    DecoderInit(String),

    /// `push` was called while the driver is idle or stopped.
    #[error("Driver is not active")]
    NotActive,

    /// I/O error while reading from a byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The byte source delivered nothing for longer than the idle timeout.
    #[error("Source idle for {0:?}")]
    SourceIdle(Duration),
}

/// Result type alias using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Failure reported by a [`FrameDecoder`](crate::decoder::FrameDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The frame is skipped; decoding continues with the next frame.
    #[error("recoverable decode error: {0}")]
    Recoverable(String),

    /// The decoder can never recover; the driver stops.
    #[error("fatal decode error: {0}")]
    Fatal(String),
}

impl DecodeError {
    /// Check if this error stops the driver.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::Fatal(_))
    }
}
