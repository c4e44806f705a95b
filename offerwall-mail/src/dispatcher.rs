//! Password-reset email dispatch
//!
//! [`ResetEmailDispatcher`] decides per call whether mail is configured.
//! When it is, a transport is built from the resolved settings and the
//! reset email is submitted; when it is not, the reset link is logged at
//! WARN level and the call still succeeds. This keeps local development
//! usable without an SMTP server.

use tracing::{error, info, warn};

use crate::config::MailConfig;
use crate::error::MailError;
use crate::message::ResetMessage;
use crate::transport::{SmtpTransportFactory, TransportFactory};

/// Where the dispatcher gets its [`MailConfig`] from
#[derive(Debug, Clone)]
enum ConfigSource {
    /// A configuration supplied at construction time
    Fixed(MailConfig),
    /// The process environment, read on every send
    Environment,
}

/// Sends password-reset emails, or logs the link when mail is unconfigured
///
/// # Examples
///
/// ```rust
/// use offerwall_mail::{MailConfig, ResetEmailDispatcher};
/// use offerwall_mail::testing::RecordingTransportFactory;
///
/// # async fn example() -> Result<(), offerwall_mail::MailError> {
/// let factory = RecordingTransportFactory::new();
/// let config = MailConfig::new()
///     .with_host("smtp.example.com")
///     .with_port("587")
///     .with_from("noreply@example.com");
///
/// let dispatcher = ResetEmailDispatcher::new(config, factory.clone());
/// dispatcher
///     .send_password_reset_email("alice@example.com", Some("Alice"), "https://example.com/reset/abc123")
///     .await?;
///
/// assert_eq!(factory.sent_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ResetEmailDispatcher<F = SmtpTransportFactory> {
    source: ConfigSource,
    factory: F,
}

impl ResetEmailDispatcher<SmtpTransportFactory> {
    /// SMTP dispatcher that reads the process environment on every send
    #[must_use]
    pub const fn smtp_from_env() -> Self {
        Self {
            source: ConfigSource::Environment,
            factory: SmtpTransportFactory,
        }
    }
}

impl<F: TransportFactory> ResetEmailDispatcher<F> {
    /// Create a dispatcher with an explicit configuration
    #[must_use]
    pub const fn new(config: MailConfig, factory: F) -> Self {
        Self {
            source: ConfigSource::Fixed(config),
            factory,
        }
    }

    /// Create a dispatcher that reads the process environment on every send
    #[must_use]
    pub const fn from_env(factory: F) -> Self {
        Self {
            source: ConfigSource::Environment,
            factory,
        }
    }

    /// The configuration the next send will use
    #[must_use]
    pub fn config(&self) -> MailConfig {
        match &self.source {
            ConfigSource::Fixed(config) => config.clone(),
            ConfigSource::Environment => MailConfig::from_env(),
        }
    }

    /// Send a password-reset email
    ///
    /// `username` is used in the greeting; when absent the recipient is
    /// greeted as "there". `recipient` and `reset_url` are used as given.
    ///
    /// If no SMTP host or port is configured, nothing is sent: the reset
    /// link is logged at WARN level and `Ok(())` is returned.
    ///
    /// # Errors
    ///
    /// - `MailError::Config` if mail is configured but the port is invalid
    ///   or no sender address can be determined. No transport is built.
    /// - `MailError::Delivery` if the transport cannot be built or the send
    ///   fails. The attempt is not retried.
    pub async fn send_password_reset_email(
        &self,
        recipient: &str,
        username: Option<&str>,
        reset_url: &str,
    ) -> Result<(), MailError> {
        let config = self.config();

        if !config.is_configured() {
            warn!(
                recipient = %recipient,
                reset_url = %reset_url,
                "SMTP not configured; logging password reset link instead of sending"
            );
            return Ok(());
        }

        let settings = config.transport_settings()?;
        let sender = config.sender()?;
        let message = ResetMessage::password_reset(recipient, sender, username, reset_url)?;

        let transport = self.factory.build(&settings)?;
        if let Err(e) = transport.send(&message).await {
            error!(
                recipient = %recipient,
                host = %settings.host,
                port = settings.port,
                error = %e,
                "Failed to send password reset email"
            );
            return Err(e.into());
        }

        info!(
            recipient = %recipient,
            host = %settings.host,
            port = settings.port,
            secure = settings.secure,
            authenticated = settings.is_authenticated(),
            "Password reset email sent"
        );

        Ok(())
    }
}
