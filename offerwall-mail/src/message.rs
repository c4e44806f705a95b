//! Password-reset message
//!
//! Both renderings of the body are produced from one set of inputs: the
//! greeting, the reset link, and the expiry notice are computed once and
//! handed to the text and HTML templates alike.

use askama::Template;

use crate::error::MailError;

/// Subject line of every password-reset email
pub const RESET_SUBJECT: &str = "Reset your password";

/// Lifetime of a reset link, as stated in the email
pub const RESET_LINK_TTL_MINUTES: u32 = 60;

/// Greeting name used when no username is known
pub const FALLBACK_GREETING_NAME: &str = "there";

#[derive(Template)]
#[template(
    source = r#"Hi {{ name }},

We received a request to reset the password for your account. Open the link below to choose a new password:

{{ reset_url }}

{{ expiry_notice }}

If you did not request a password reset, you can ignore this email and your password will stay the same."#,
    ext = "txt"
)]
struct ResetEmailText<'a> {
    name: &'a str,
    reset_url: &'a str,
    expiry_notice: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>Hi {{ name }},</p>
    <p>We received a request to reset the password for your account. Click the button below to choose a new password:</p>
    <p style="text-align: center;">
        <a href="{{ reset_url }}" style="display: inline-block; padding: 12px 24px; background-color: #4CAF50; color: white; text-decoration: none; border-radius: 4px;">Reset password</a>
    </p>
    <p>If the button doesn't work, copy this link into your browser:<br>{{ reset_url }}</p>
    <p>{{ expiry_notice }}</p>
    <p>If you did not request a password reset, you can ignore this email and your password will stay the same.</p>
</body>
</html>"#,
    ext = "html"
)]
struct ResetEmailHtml<'a> {
    name: &'a str,
    reset_url: &'a str,
    expiry_notice: &'a str,
}

/// A composed password-reset email
///
/// Built per send and never mutated. The sender is always non-empty.
///
/// ```rust
/// use offerwall_mail::ResetMessage;
///
/// let message = ResetMessage::password_reset(
///     "alice@example.com",
///     "noreply@example.com",
///     Some("Alice"),
///     "https://example.com/reset/abc123",
/// )?;
///
/// assert!(message.text().starts_with("Hi Alice,"));
/// assert!(message.html().contains("https://example.com/reset/abc123"));
/// # Ok::<(), offerwall_mail::MailError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetMessage {
    to: String,
    from: String,
    subject: String,
    text: String,
    html: String,
}

impl ResetMessage {
    /// Compose a password-reset email
    ///
    /// An absent or empty `username` is greeted as "there".
    ///
    /// # Errors
    ///
    /// Returns `MailError::Config` if `from` is empty, and
    /// `MailError::Template` if a body fails to render.
    pub fn password_reset(
        to: &str,
        from: &str,
        username: Option<&str>,
        reset_url: &str,
    ) -> Result<Self, MailError> {
        if from.is_empty() {
            return Err(MailError::config("sender address must not be empty"));
        }

        let name = greeting_name(username);
        let expiry_notice = expiry_notice();

        let text = ResetEmailText {
            name,
            reset_url,
            expiry_notice: &expiry_notice,
        }
        .render()?;

        let html = ResetEmailHtml {
            name,
            reset_url,
            expiry_notice: &expiry_notice,
        }
        .render()?;

        Ok(Self {
            to: to.to_string(),
            from: from.to_string(),
            subject: RESET_SUBJECT.to_string(),
            text,
            html,
        })
    }

    /// Recipient address
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Sender address
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Subject line
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Plain text body
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// HTML body
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

fn greeting_name(username: Option<&str>) -> &str {
    match username {
        Some(name) if !name.is_empty() => name,
        _ => FALLBACK_GREETING_NAME,
    }
}

fn expiry_notice() -> String {
    format!("This link will expire in {RESET_LINK_TTL_MINUTES} minutes.")
}
