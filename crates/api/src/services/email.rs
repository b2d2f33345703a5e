//! Outgoing email.
//!
//! Providers:
//! - `console`: logs the message (development)
//! - `smtp`: sends through an SMTP relay with lettre, STARTTLS or implicit TLS
//!
//! When email is disabled every send is logged and reported as successful.

use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;
use crate::middleware::metrics::record_email;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email provider not configured: {0}")]
    NotConfigured(String),

    #[error("Email has no recipients")]
    NoRecipients,

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A message ready to send.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    /// Plain text body
    pub text: String,
    /// HTML alternative
    pub html: Option<String>,
    pub reply_to: Option<String>,
}

impl EmailMessage {
    pub fn new(to: impl Into<Vec<String>>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
            reply_to: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    smtp: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("enabled", &self.config.enabled)
            .field("provider", &self.config.provider)
            .finish()
    }
}

impl EmailService {
    /// Builds the SMTP transport once when the smtp provider is enabled.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let smtp = if config.enabled && config.provider == "smtp" {
            Some(build_smtp_transport(&config)?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            smtp,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if message.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        if !self.config.enabled {
            info!(
                to = ?message.to,
                subject = %message.subject,
                "Email disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                self.send_console(message);
                Ok(())
            }
            "smtp" => self.send_smtp(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured(provider.to_string()))
            }
        }
    }

    /// Sends and records the outcome under `kind`. Failures are logged, not returned.
    pub async fn send_logged(&self, kind: &'static str, message: &EmailMessage) -> bool {
        match self.send(message).await {
            Ok(()) => {
                record_email(kind, "sent");
                true
            }
            Err(e) => {
                record_email(kind, "failed");
                error!(kind, error = %e, subject = %message.subject, "Failed to send email");
                false
            }
        }
    }

    fn send_console(&self, message: &EmailMessage) {
        info!(
            to = ?message.to,
            reply_to = ?message.reply_to,
            from = %self.config.sender_email,
            subject = %message.subject,
            "Email (console provider)"
        );
        info!(body_text = %message.text, "Email body");
        if let Some(html) = &message.html {
            debug!(body_html_length = html.len(), "Email HTML body");
        }
    }

    async fn send_smtp(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let transport = self
            .smtp
            .as_ref()
            .ok_or_else(|| EmailError::NotConfigured("smtp".to_string()))?;

        let email = self.build_message(message)?;
        transport.send(email).await?;

        info!(to = ?message.to, subject = %message.subject, "Email sent via SMTP");
        Ok(())
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from = Mailbox::new(
            Some(self.config.sender_name.clone()),
            self.config.sender_email.parse()?,
        );

        let mut builder = Message::builder().from(from).subject(&message.subject);
        for to in &message.to {
            builder = builder.to(Mailbox::new(None, to.parse()?));
        }
        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(Mailbox::new(None, reply_to.parse()?));
        }

        let email = match &message.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                html.clone(),
            ))?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text.clone())?,
        };
        Ok(email)
    }
}

fn build_smtp_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    if config.smtp_host.is_empty() {
        return Err(EmailError::NotConfigured("smtp_host".to_string()));
    }

    let builder = if config.smtp_secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
    };

    let mut builder = builder.port(config.smtp_port);
    if !config.smtp_username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));
    }

    Ok(builder.build())
}

/// Escapes text for interpolation into an HTML template.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
