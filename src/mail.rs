/*!
 * Mail Relay
 * Contact notifications sent through a Resend-compatible transactional email API
 */
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::MailConfig;
use crate::content::ContactSubmission;
use crate::markup::escape_xml;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email relay request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("email relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    /// False when no relay is configured and `send` would be a no-op.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Used when no API key is configured.
#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::debug!(subject = %email.subject, "email relay disabled, message dropped");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

pub struct ResendMailer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let url = format!("{}/emails", self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "email relay returned error");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(subject = %email.subject, "email relayed");
        Ok(())
    }
}

/// Pick the relay for this configuration.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.api_key {
        Some(key) => Ok(Arc::new(ResendMailer::new(config.api_base.clone(), key.clone())?)),
        None => {
            tracing::info!("RESEND_API_KEY not set. Contact submissions will not be emailed.");
            Ok(Arc::new(DisabledMailer))
        }
    }
}

/// Notification for the agency inbox about a new contact submission.
pub fn contact_notification(submission: &ContactSubmission, config: &MailConfig) -> OutgoingEmail {
    let optional = |label: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|v| format!("<p><strong>{}:</strong> {}</p>", label, escape_xml(v)))
            .unwrap_or_default()
    };

    let html = format!(
        "<h2>New contact form submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         {}{}{}\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_xml(&submission.name),
        escape_xml(&submission.email),
        optional("Company", &submission.company),
        optional("Service", &submission.service),
        optional("Budget", &submission.budget),
        escape_xml(&submission.message).replace('\n', "<br>"),
    );

    OutgoingEmail {
        from: config.from.clone(),
        to: vec![config.to.clone()],
        subject: format!("New inquiry from {}", submission.name),
        html,
        reply_to: Some(submission.email.clone()),
    }
}
