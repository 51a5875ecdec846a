//! # Error Types
//!
//! This module defines error types used throughout the papelito library.

use thiserror::Error;

/// Main error type for papelito operations
#[derive(Debug, Error)]
pub enum PapelitoError {
    /// The printer device cannot be reached or written.
    ///
    /// This is transient: the job buffer is kept intact and the caller may
    /// retry once the device is back.
    #[error("Printer not available at {device}: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed document input
    #[error("Document error: {0}")]
    Document(String),

    /// Setting outside its accepted range
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PapelitoError {
    /// Whether retrying the same job later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DeviceUnavailable { .. })
    }
}
