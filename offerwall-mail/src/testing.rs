//! Testing utilities for mail dispatch
//!
//! Provides a recording transport factory for asserting on what the
//! dispatcher would have sent, without touching the network.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::message::ResetMessage;
use crate::transport::{MailTransport, TransportFactory, TransportSettings};

#[derive(Debug, Default)]
struct Recorded {
    built: Vec<TransportSettings>,
    sent: Vec<ResetMessage>,
    rejection: Option<String>,
}

/// Transport factory that records settings and messages in memory
///
/// Clones share the same record, so keep one clone for assertions and hand
/// another to the dispatcher.
///
/// # Examples
///
/// ```rust
/// use offerwall_mail::{MailConfig, ResetEmailDispatcher};
/// use offerwall_mail::testing::RecordingTransportFactory;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let factory = RecordingTransportFactory::new();
/// let config = MailConfig::new()
///     .with_host("smtp.example.com")
///     .with_port("465")
///     .with_credentials("mailer@example.com", "secret");
///
/// ResetEmailDispatcher::new(config, factory.clone())
///     .send_password_reset_email("alice@example.com", None, "https://example.com/reset/abc123")
///     .await?;
///
/// let settings = factory.last_settings().unwrap();
/// assert!(settings.secure);
/// assert!(settings.credentials.is_some());
/// assert!(factory.was_sent_to("alice@example.com"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransportFactory {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTransportFactory {
    /// Create a factory whose transports accept every message
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory whose transports reject every message
    ///
    /// The rejection surfaces as `TransportError::Other` with `reason`.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        let factory = Self::new();
        factory.lock().rejection = Some(reason.into());
        factory
    }

    /// Number of transports built so far
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.lock().built.len()
    }

    /// Settings passed to the most recent build
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn last_settings(&self) -> Option<TransportSettings> {
        self.lock().built.last().cloned()
    }

    /// Number of messages accepted so far
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.lock().sent.len()
    }

    /// All accepted messages
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn sent_messages(&self) -> Vec<ResetMessage> {
        self.lock().sent.clone()
    }

    /// The most recently accepted message
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn last_sent(&self) -> Option<ResetMessage> {
        self.lock().sent.last().cloned()
    }

    /// Check if a message was accepted for a specific recipient
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.lock().sent.iter().any(|message| message.to() == address)
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap()
    }
}

impl TransportFactory for RecordingTransportFactory {
    fn build(&self, settings: &TransportSettings) -> Result<Box<dyn MailTransport>, TransportError> {
        self.lock().built.push(settings.clone());
        Ok(Box::new(RecordingTransport {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &ResetMessage) -> Result<(), TransportError> {
        let mut recorded = self.inner.lock().unwrap();
        if let Some(reason) = &recorded.rejection {
            return Err(TransportError::other(reason.clone()));
        }
        recorded.sent.push(message.clone());
        Ok(())
    }
}
