//! Mail error types

use thiserror::Error;

/// Errors returned by [`ResetEmailDispatcher`](crate::ResetEmailDispatcher)
#[derive(Debug, Error)]
pub enum MailError {
    /// Mail is configured but cannot be used as given
    ///
    /// Raised before any transport is built.
    #[error("mail configuration error: {0}")]
    Config(String),

    /// Email body rendering error
    #[error("failed to render email body: {0}")]
    Template(#[from] askama::Error),

    /// The transport failed to build or rejected the message
    #[error("failed to deliver email: {0}")]
    Delivery(#[from] TransportError),
}

impl MailError {
    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` for configuration errors
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` for delivery errors
    #[must_use]
    pub const fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}

/// Errors raised at the transport seam
#[derive(Debug, Error)]
pub enum TransportError {
    /// An address could not be parsed into a mailbox
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The outgoing message could not be assembled
    #[error("failed to build message: {0}")]
    Message(String),

    /// SMTP client error (connection, TLS, authentication, rejection)
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a message assembly error from a string message
    #[must_use]
    pub fn message<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Create a generic transport error from a string message
    #[must_use]
    pub fn other<T: Into<String>>(msg: T) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = MailError::config("no sender address");
        assert!(err.is_config());
        assert!(!err.is_delivery());
        assert_eq!(err.to_string(), "mail configuration error: no sender address");
    }

    #[test]
    fn test_delivery_wraps_transport_error() {
        let err: MailError = TransportError::other("connection refused").into();
        assert!(err.is_delivery());
        assert_eq!(err.to_string(), "failed to deliver email: connection refused");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection refused"));
    }
}
