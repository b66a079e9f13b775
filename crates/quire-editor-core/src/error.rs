//! Error types for platform and host operations.
//!
//! None of these are fatal. The session recovers from every variant locally,
//! logging it and leaving the prior state unchanged.

use thiserror::Error;

/// Errors raised by a platform implementation (browser DOM, test fakes).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlatformError {
    /// The runtime does not support this command or query in the current context.
    #[error("command not supported: {0}")]
    Unsupported(&'static str),

    /// A required element is missing from the document.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// The underlying DOM call threw.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError::Dom(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError::Dom(s)
    }
}

/// Errors raised while delivering a change notification to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// The host side has gone away.
    #[error("host disconnected")]
    Disconnected,

    /// The host callback threw.
    #[error("host callback failed: {0}")]
    Callback(String),
}
