//! Mail configuration
//!
//! The dispatcher works from a [`MailConfig`], a raw snapshot of the SMTP
//! settings. It can be injected directly or read from the process
//! environment at send time:
//!
//! - `SMTP_HOST`: SMTP server hostname
//! - `SMTP_PORT`: SMTP server port
//! - `SMTP_SECURE`: `"true"` to force implicit TLS
//! - `SMTP_USER` / `SMTP_PASS`: optional credential pair
//! - `EMAIL_FROM`: sender address (falls back to `SMTP_USER`)
//!
//! Empty values are treated as unset.
//!
//! # Examples
//!
//! ```rust
//! use offerwall_mail::MailConfig;
//!
//! let config = MailConfig::new()
//!     .with_host("smtp.example.com")
//!     .with_port("587")
//!     .with_from("noreply@example.com");
//!
//! assert!(config.is_configured());
//! ```

use crate::error::MailError;
use crate::transport::{SmtpCredentials, TransportSettings};

/// Environment variable holding the SMTP hostname
pub const SMTP_HOST: &str = "SMTP_HOST";
/// Environment variable holding the SMTP port
pub const SMTP_PORT: &str = "SMTP_PORT";
/// Environment variable forcing implicit TLS when set to `"true"`
pub const SMTP_SECURE: &str = "SMTP_SECURE";
/// Environment variable holding the SMTP username
pub const SMTP_USER: &str = "SMTP_USER";
/// Environment variable holding the SMTP password
pub const SMTP_PASS: &str = "SMTP_PASS";
/// Environment variable holding the sender address
pub const EMAIL_FROM: &str = "EMAIL_FROM";

/// Port on which SMTP servers expect implicit TLS
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Raw mail settings, as supplied by the environment or the embedding caller
///
/// Nothing is validated here beyond presence; see
/// [`MailConfig::transport_settings`] and [`MailConfig::sender`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP server hostname
    pub host: Option<String>,

    /// SMTP server port, unparsed
    pub port: Option<String>,

    /// Implicit TLS flag, unparsed; only `"true"` enables it
    pub secure: Option<String>,

    /// SMTP username
    pub user: Option<String>,

    /// SMTP password
    pub pass: Option<String>,

    /// Sender address
    pub from: Option<String>,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .finish()
    }
}

impl MailConfig {
    /// Create an empty (unconfigured) mail configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the mail configuration from the process environment
    ///
    /// Called on every send by a dispatcher built with
    /// [`ResetEmailDispatcher::from_env`](crate::ResetEmailDispatcher::from_env).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Keys are the environment variable names (`SMTP_HOST`, ...).
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use offerwall_mail::MailConfig;
    ///
    /// let vars = HashMap::from([("SMTP_HOST", "localhost"), ("SMTP_PORT", "1025")]);
    /// let config = MailConfig::from_lookup(|key| vars.get(key).map(ToString::to_string));
    ///
    /// assert_eq!(config.host.as_deref(), Some("localhost"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            host: read(SMTP_HOST),
            port: read(SMTP_PORT),
            secure: read(SMTP_SECURE),
            user: read(SMTP_USER),
            pass: read(SMTP_PASS),
            from: read(EMAIL_FROM),
        }
    }

    /// Set the SMTP hostname
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = non_empty(host.into());
        self
    }

    /// Set the SMTP port
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = non_empty(port.into());
        self
    }

    /// Set the implicit TLS flag
    #[must_use]
    pub fn with_secure(mut self, secure: impl Into<String>) -> Self {
        self.secure = non_empty(secure.into());
        self
    }

    /// Set the SMTP username and password
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = non_empty(user.into());
        self.pass = non_empty(pass.into());
        self
    }

    /// Set the SMTP username only
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = non_empty(user.into());
        self
    }

    /// Set the sender address
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = non_empty(from.into());
        self
    }

    /// Whether outbound mail is configured
    ///
    /// Only checks that a host and a port are present. Credentials and
    /// reachability are not considered, so unauthenticated relays work.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }

    /// Resolve the connection parameters for the transport
    ///
    /// # Errors
    ///
    /// Returns `MailError::Config` if host or port is missing, or if the port
    /// is not a valid port number.
    pub fn transport_settings(&self) -> Result<TransportSettings, MailError> {
        let host = self
            .host
            .clone()
            .ok_or_else(|| MailError::config("SMTP_HOST is not set"))?;

        let raw_port = self
            .port
            .as_deref()
            .ok_or_else(|| MailError::config("SMTP_PORT is not set"))?;
        let port: u16 = raw_port
            .trim()
            .parse()
            .map_err(|_| MailError::config(format!("SMTP_PORT must be a valid port number, got {raw_port:?}")))?;

        let secure = self.secure.as_deref() == Some("true") || port == IMPLICIT_TLS_PORT;

        let credentials = match (&self.user, &self.pass) {
            (Some(user), Some(pass)) => Some(SmtpCredentials::new(user.clone(), pass.clone())),
            _ => None,
        };

        Ok(TransportSettings {
            host,
            port,
            secure,
            credentials,
        })
    }

    /// Resolve the sender address: `EMAIL_FROM`, else `SMTP_USER`
    ///
    /// # Errors
    ///
    /// Returns `MailError::Config` if neither is set.
    pub fn sender(&self) -> Result<&str, MailError> {
        self.from
            .as_deref()
            .or(self.user.as_deref())
            .ok_or_else(|| MailError::config("no sender address: set EMAIL_FROM or SMTP_USER"))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
