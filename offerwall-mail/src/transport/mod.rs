//! Mail transports
//!
//! A [`TransportFactory`] turns resolved [`TransportSettings`] into a
//! [`MailTransport`] for a single send. The dispatcher builds a fresh
//! transport per call; nothing is pooled.
//!
//! - **SMTP**: [`SmtpTransportFactory`], backed by `lettre` (production)
//! - **Recording**: [`RecordingTransportFactory`](crate::testing::RecordingTransportFactory) (tests)

pub mod smtp;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::message::ResetMessage;

pub use smtp::{SmtpTransport, SmtpTransportFactory};

/// SMTP username and password
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,
}

impl SmtpCredentials {
    /// Create a credential pair
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection parameters resolved from a [`MailConfig`](crate::MailConfig)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port
    pub port: u16,

    /// Negotiate TLS on connect instead of upgrading with STARTTLS
    pub secure: bool,

    /// Credentials, if the transport should authenticate
    pub credentials: Option<SmtpCredentials>,
}

impl TransportSettings {
    /// Whether the transport will authenticate
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Something that can submit a composed message to a mail endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Submit a message for delivery
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the message cannot be built or the
    /// server rejects it
    async fn send(&self, message: &ResetMessage) -> Result<(), TransportError>;
}

/// Builds a [`MailTransport`] from connection parameters
#[cfg_attr(test, mockall::automock)]
pub trait TransportFactory: Send + Sync {
    /// Build a transport for one send
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the transport cannot be set up
    fn build(&self, settings: &TransportSettings) -> Result<Box<dyn MailTransport>, TransportError>;
}

impl<T: TransportFactory + ?Sized> TransportFactory for std::sync::Arc<T> {
    fn build(&self, settings: &TransportSettings) -> Result<Box<dyn MailTransport>, TransportError> {
        (**self).build(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = SmtpCredentials::new("user".to_string(), "hunter2".to_string());
        let debug = format!("{credentials:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_is_authenticated() {
        let mut settings = TransportSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            credentials: None,
        };
        assert!(!settings.is_authenticated());

        settings.credentials = Some(SmtpCredentials::new("u".to_string(), "p".to_string()));
        assert!(settings.is_authenticated());
    }
}
