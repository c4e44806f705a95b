//! SMTP transport
//!
//! Uses the `lettre` crate to submit messages to an SMTP server.

use async_trait::async_trait;
use lettre::{
    message::{header, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use super::{MailTransport, TransportFactory, TransportSettings};
use crate::error::TransportError;
use crate::message::ResetMessage;

/// Builds a [`SmtpTransport`] per send
///
/// # Examples
///
/// ```rust,no_run
/// use offerwall_mail::{ResetEmailDispatcher, SmtpTransportFactory};
///
/// # async fn example() -> Result<(), offerwall_mail::MailError> {
/// let dispatcher = ResetEmailDispatcher::from_env(SmtpTransportFactory);
///
/// dispatcher
///     .send_password_reset_email("user@example.com", Some("Alice"), "https://example.com/reset/abc123")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransportFactory;

impl TransportFactory for SmtpTransportFactory {
    fn build(&self, settings: &TransportSettings) -> Result<Box<dyn MailTransport>, TransportError> {
        Ok(Box::new(SmtpTransport::new(settings)?))
    }
}

/// SMTP transport for a single connection target
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Create an SMTP transport from resolved settings
    ///
    /// `secure` selects implicit TLS; otherwise STARTTLS is used when the
    /// server offers it. Credentials are attached only when present.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Smtp` if the TLS parameters cannot be built
    pub fn new(settings: &TransportSettings) -> Result<Self, TransportError> {
        let tls_parameters = TlsParameters::new(settings.host.clone())?;
        let tls = if settings.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls);

        if let Some(credentials) = &settings.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }

        Ok(Self {
            inner: builder.build(),
        })
    }

    /// Build lettre Message from a reset message
    fn build_message(message: &ResetMessage) -> Result<Message, TransportError> {
        let from: Mailbox = message
            .from()
            .parse()
            .map_err(|_| TransportError::InvalidAddress(message.from().to_string()))?;
        let to: Mailbox = message
            .to()
            .parse()
            .map_err(|_| TransportError::InvalidAddress(message.to().to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(message.text().to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(message.html().to_string()),
                    ),
            )
            .map_err(|e| TransportError::message(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, message: &ResetMessage) -> Result<(), TransportError> {
        let email = Self::build_message(message)?;

        let response = self.inner.send(email).await?;
        debug!(code = %response.code(), "SMTP server accepted message");

        Ok(())
    }
}
