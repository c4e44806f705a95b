//! Integration tests for password-reset dispatch
//!
//! Drives the public dispatcher API against the recording transport and a
//! captured log subscriber.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use offerwall_mail::testing::RecordingTransportFactory;
use offerwall_mail::{MailConfig, ResetEmailDispatcher};
use tracing_subscriber::fmt::MakeWriter;

const RECIPIENT: &str = "alice@example.com";
const URL: &str = "https://example.com/reset/abc123";

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

fn env(vars: &[(&str, &str)]) -> MailConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    MailConfig::from_lookup(|key| vars.get(key).cloned())
}

fn configured() -> MailConfig {
    env(&[
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "587"),
        ("EMAIL_FROM", "noreply@example.com"),
    ])
}

#[tokio::test]
async fn unconfigured_mail_logs_link_instead_of_sending() {
    let (logs, _guard) = capture_logs();
    let factory = RecordingTransportFactory::new();

    let dispatcher = ResetEmailDispatcher::new(MailConfig::new(), factory.clone());
    dispatcher
        .send_password_reset_email(RECIPIENT, Some("Alice"), URL)
        .await
        .unwrap();

    assert_eq!(factory.build_count(), 0);
    assert_eq!(factory.sent_count(), 0);

    let output = logs.contents();
    assert!(output.contains("WARN"), "expected a warning, got: {output}");
    assert!(output.contains(URL), "expected the reset link, got: {output}");
}

#[tokio::test]
async fn host_or_port_alone_is_not_configured() {
    for vars in [
        vec![("SMTP_HOST", "smtp.example.com"), ("EMAIL_FROM", "noreply@example.com")],
        vec![("SMTP_PORT", "587"), ("EMAIL_FROM", "noreply@example.com")],
    ] {
        let factory = RecordingTransportFactory::new();
        let dispatcher = ResetEmailDispatcher::new(env(&vars), factory.clone());

        dispatcher
            .send_password_reset_email(RECIPIENT, None, URL)
            .await
            .unwrap();

        assert_eq!(factory.build_count(), 0, "vars: {vars:?}");
    }
}

#[tokio::test]
async fn missing_sender_is_config_error_before_transport() {
    let factory = RecordingTransportFactory::new();
    let config = env(&[("SMTP_HOST", "smtp.example.com"), ("SMTP_PORT", "587")]);

    let err = ResetEmailDispatcher::new(config, factory.clone())
        .send_password_reset_email(RECIPIENT, Some("Alice"), URL)
        .await
        .unwrap_err();

    assert!(err.is_config(), "unexpected error: {err}");
    assert_eq!(factory.build_count(), 0);
}

#[tokio::test]
async fn non_numeric_port_is_config_error() {
    let factory = RecordingTransportFactory::new();
    let config = configured().with_port("submission");

    let err = ResetEmailDispatcher::new(config, factory.clone())
        .send_password_reset_email(RECIPIENT, None, URL)
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert_eq!(factory.build_count(), 0);
}

#[tokio::test]
async fn secure_flag_follows_env_flag_or_port_465() {
    let cases = [
        (Some("true"), "465", true),
        (Some("true"), "587", true),
        (None, "465", true),
        (None, "587", false),
    ];

    for (secure, port, expected) in cases {
        let factory = RecordingTransportFactory::new();
        let mut config = configured().with_port(port);
        if let Some(secure) = secure {
            config = config.with_secure(secure);
        }

        ResetEmailDispatcher::new(config, factory.clone())
            .send_password_reset_email(RECIPIENT, None, URL)
            .await
            .unwrap();

        let settings = factory.last_settings().unwrap();
        assert_eq!(settings.secure, expected, "SMTP_SECURE={secure:?} SMTP_PORT={port}");
    }
}

#[tokio::test]
async fn credentials_attached_only_with_user_and_pass() {
    let cases = [
        (Some("mailer@example.com"), Some("secret"), true),
        (Some("mailer@example.com"), None, false),
        (None, Some("secret"), false),
        (None, None, false),
    ];

    for (user, pass, expected) in cases {
        let mut vars = vec![
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("EMAIL_FROM", "noreply@example.com"),
        ];
        if let Some(user) = user {
            vars.push(("SMTP_USER", user));
        }
        if let Some(pass) = pass {
            vars.push(("SMTP_PASS", pass));
        }

        let factory = RecordingTransportFactory::new();
        ResetEmailDispatcher::new(env(&vars), factory.clone())
            .send_password_reset_email(RECIPIENT, None, URL)
            .await
            .unwrap();

        let settings = factory.last_settings().unwrap();
        assert_eq!(settings.credentials.is_some(), expected, "user={user:?} pass={pass:?}");
        if let Some(credentials) = settings.credentials {
            assert_eq!(credentials.username, "mailer@example.com");
            assert_eq!(credentials.password, "secret");
        }
    }
}

#[tokio::test]
async fn sender_falls_back_to_smtp_user() {
    let factory = RecordingTransportFactory::new();
    let config = env(&[
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "587"),
        ("SMTP_USER", "mailer@example.com"),
    ]);

    ResetEmailDispatcher::new(config, factory.clone())
        .send_password_reset_email(RECIPIENT, None, URL)
        .await
        .unwrap();

    let message = factory.last_sent().unwrap();
    assert_eq!(message.from(), "mailer@example.com");
    // A user without a password still sends, unauthenticated.
    assert!(factory.last_settings().unwrap().credentials.is_none());
}

#[tokio::test]
async fn both_bodies_carry_link_and_expiry() {
    let factory = RecordingTransportFactory::new();

    ResetEmailDispatcher::new(configured(), factory.clone())
        .send_password_reset_email(RECIPIENT, Some("Alice"), URL)
        .await
        .unwrap();

    let message = factory.last_sent().unwrap();
    assert_eq!(message.to(), RECIPIENT);
    assert_eq!(message.subject(), "Reset your password");
    for body in [message.text(), message.html()] {
        assert!(body.contains(URL));
        assert!(body.contains("60 minutes"));
        assert!(body.contains("Hi Alice,"));
    }
}

#[tokio::test]
async fn absent_username_greets_there() {
    let factory = RecordingTransportFactory::new();

    ResetEmailDispatcher::new(configured(), factory.clone())
        .send_password_reset_email(RECIPIENT, None, URL)
        .await
        .unwrap();

    let message = factory.last_sent().unwrap();
    assert!(message.text().starts_with("Hi there,"));
    assert!(message.html().contains("Hi there,"));
}

#[tokio::test]
async fn transport_rejection_is_delivery_error() {
    let factory = RecordingTransportFactory::rejecting("535 5.7.8 authentication failed");

    let err = ResetEmailDispatcher::new(configured(), factory.clone())
        .send_password_reset_email(RECIPIENT, Some("Alice"), URL)
        .await
        .unwrap_err();

    assert!(err.is_delivery(), "unexpected error: {err}");
    assert!(err.to_string().contains("535 5.7.8 authentication failed"));
    assert_eq!(factory.build_count(), 1);
    assert_eq!(factory.sent_count(), 0);
}

#[tokio::test]
async fn each_send_builds_its_own_transport() {
    let factory = RecordingTransportFactory::new();
    let dispatcher = Arc::new(ResetEmailDispatcher::new(configured(), factory.clone()));

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher
                    .send_password_reset_email(&format!("user{i}@example.com"), None, URL)
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(factory.build_count(), 5);
    assert_eq!(factory.sent_count(), 5);
    assert!(factory.was_sent_to("user0@example.com"));
    assert!(factory.was_sent_to("user4@example.com"));
}
