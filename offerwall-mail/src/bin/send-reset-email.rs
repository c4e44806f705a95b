//! send-reset-email: dispatch one password-reset email
//!
//! Reads the SMTP settings from the environment exactly as the web backend
//! does, which makes it the quickest way to check a mail setup.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use offerwall_mail::{observability, ResetEmailDispatcher};

#[derive(Parser)]
#[command(name = "send-reset-email")]
#[command(version)]
#[command(about = "Send a password reset email using the SMTP_* environment settings", long_about = None)]
struct Cli {
    /// Recipient email address
    #[arg(long)]
    to: String,

    /// Reset link to include in the email
    #[arg(long)]
    url: String,

    /// Name used in the greeting
    #[arg(long)]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init()?;

    let dispatcher = ResetEmailDispatcher::smtp_from_env();
    let config = dispatcher.config();
    if !config.is_configured() {
        tracing::info!("SMTP_HOST/SMTP_PORT not set; the reset link will only be logged");
    }

    dispatcher
        .send_password_reset_email(&cli.to, cli.username.as_deref(), &cli.url)
        .await
        .with_context(|| format!("failed to send password reset email to {}", cli.to))?;

    Ok(())
}
