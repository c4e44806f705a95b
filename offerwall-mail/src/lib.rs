//! offerwall-mail: password-reset email dispatch for the offerwall backend
//!
//! The offerwall web application calls into this crate when a user asks
//! for a password reset. [`ResetEmailDispatcher`] composes the reset email
//! and submits it over SMTP, or, when no SMTP server is configured, logs
//! the reset link so local development keeps working.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use offerwall_mail::ResetEmailDispatcher;
//!
//! # async fn handler() -> Result<(), offerwall_mail::MailError> {
//! // Reads SMTP_HOST, SMTP_PORT, ... on every send
//! let dispatcher = ResetEmailDispatcher::smtp_from_env();
//!
//! dispatcher
//!     .send_password_reset_email(
//!         "alice@example.com",
//!         Some("Alice"),
//!         "https://offerwall.example.com/reset/abc123",
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `cli` - the `send-reset-email` binary (default)

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod observability;
pub mod testing;
pub mod transport;

pub use config::MailConfig;
pub use dispatcher::ResetEmailDispatcher;
pub use error::{MailError, TransportError};
pub use message::ResetMessage;
pub use transport::{
    MailTransport, SmtpCredentials, SmtpTransport, SmtpTransportFactory, TransportFactory,
    TransportSettings,
};
