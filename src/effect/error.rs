//! Error types of the effect core.
//!
//! Domain failures are always the caller's own error type. The types here
//! cover the two places where the library itself has something to report:
//!
//! - [`PanicError`]: a panic caught at a `try_catch` boundary, before the
//!   caller's projection turns it into a domain failure
//! - [`ConfigError`]: an invalid [`ParallelConfig`](super::ParallelConfig)

use std::any::Any;

use thiserror::Error;

/// A panic captured by `try_catch`.
///
/// The message is taken from `&str` and `String` payloads; any other
/// payload type is reported as `"Unknown panic"`.
///
/// # Examples
///
/// ```rust
/// use lamina::effect::PanicError;
///
/// let error = PanicError::new("index out of bounds");
/// assert_eq!(error.to_string(), "computation panicked: index out of bounds");
/// assert_eq!(error.message(), "index out of bounds");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("computation panicked: {message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    /// Creates a `PanicError` with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts the message from a panic payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "Unknown panic".to_string()
        };
        Self { message }
    }

    /// Returns the panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while building a [`ParallelConfig`](super::ParallelConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The concurrency limit was zero; at least one task must be allowed.
    #[error("parallel traversal: concurrency limit must be greater than 0")]
    InvalidConcurrency,
}
