//! The feature-disabled control signal.

use thiserror::Error;

/// Raised by an implementation to say "this feature path is switched off".
///
/// The dispatcher never wraps this error. Whatever payload the
/// implementation raised is exactly what the caller receives in
/// [`FlipError::FeatureDisabled`](crate::FlipError::FeatureDisabled).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("feature not enabled: {message}")]
pub struct FeatureNotEnabled {
    message: String,
    operation: Option<&'static str>,
}

impl FeatureNotEnabled {
    /// Create a new signal with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            operation: None,
        }
    }

    /// Attach the operation that refused to run.
    pub fn for_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// The message given by the implementation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The operation that refused to run, if recorded.
    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }
}
