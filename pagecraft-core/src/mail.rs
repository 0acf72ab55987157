//! OTP email delivery

use crate::error::DeliveryError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// A one-time code addressed to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpMessage {
    pub to: String,
    pub code: String,
}

/// Sends one-time codes to users
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), DeliveryError>;
}

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address; defaults to the SMTP username
    pub from: Option<String>,
}

/// Delivers codes over SMTP with STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, DeliveryError> {
        let from_addr = config.from.clone().unwrap_or_else(|| config.username.clone());
        let from: Mailbox = from_addr
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(from_addr.clone()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }
}

/// HTML body of the reset email
pub fn otp_email_body(code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Password Reset Request</h2>
  <p>You have requested to reset your password. Use the following code to proceed:</p>
  <div style="background-color: #f5f5f5; padding: 15px; text-align: center; margin: 20px 0;">
    <h1 style="margin: 0;">{}</h1>
  </div>
  <p>This code will expire in 5 minutes.</p>
  <p>If you did not request a password reset, please ignore this email.</p>
</div>"#,
        code
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), DeliveryError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(message.to.clone()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Password Reset OTP")
            .header(ContentType::TEXT_HTML)
            .body(otp_email_body(&message.code))
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        tracing::info!(to = %message.to, "OTP email sent");
        Ok(())
    }
}

/// Logs codes instead of sending them (for development without SMTP)
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), DeliveryError> {
        tracing::info!(to = %message.to, code = %message.code, "OTP email (not sent, no SMTP configured)");
        Ok(())
    }
}

/// Records messages in memory (for testing)
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OtpMessage>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OtpMessage> {
        self.sent.lock().await.clone()
    }

    /// Most recent code sent to an address
    pub async fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .map(|m| m.code.clone())
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport("mailer offline".to_string()));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
