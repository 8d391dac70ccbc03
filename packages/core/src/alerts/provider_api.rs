//! Transactional-email provider transport.
//!
//! Speaks the Brevo `/v3/smtp/email` request shape: API key in the
//! `api-key` header, sender, recipients, subject and content in JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::dispatcher::MailDispatcher;
use super::error::DispatchError;
use super::message::AlertEmail;
use super::types::{DispatchReceipt, DispatchResult, EmergencyAlert};
use crate::config::{ProviderApiSettings, Secret};

pub struct ProviderApiDispatcher {
    http: Client,
    url: String,
    api_key: Option<Secret>,
    sender: Option<String>,
    sender_name: String,
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

impl ProviderApiDispatcher {
    pub fn new(settings: &ProviderApiSettings, timeout: Duration) -> Result<Self, DispatchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DispatchError::Build(err.to_string()))?;

        Ok(Self {
            http,
            url: settings.url.clone(),
            api_key: settings.api_key.clone(),
            sender: settings.sender.clone(),
            sender_name: settings.sender_name.clone(),
        })
    }

    fn credentials(&self) -> Result<(&Secret, &str), DispatchError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| DispatchError::MissingConfig("EMAIL_API_KEY is not set".to_string()))?;
        let sender = self
            .sender
            .as_deref()
            .ok_or_else(|| DispatchError::MissingConfig("EMAIL_SENDER is not set".to_string()))?;
        Ok((api_key, sender))
    }
}

#[async_trait]
impl MailDispatcher for ProviderApiDispatcher {
    fn transport_name(&self) -> &'static str {
        "provider_api"
    }

    fn ensure_configured(&self) -> Result<(), DispatchError> {
        self.credentials().map(|_| ())
    }

    async fn dispatch(&self, alert: &EmergencyAlert) -> DispatchResult {
        let (api_key, sender) = self.credentials()?;

        let email = AlertEmail::compose(alert);
        let body = SendEmailRequest {
            sender: Contact {
                name: Some(&self.sender_name),
                email: sender,
            },
            to: vec![Contact {
                name: None,
                email: &email.recipient,
            }],
            subject: &email.subject,
            html_content: &email.html,
            text_content: &email.text,
        };

        let response = self
            .http
            .post(&self.url)
            .header("api-key", api_key.expose())
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| DispatchError::Delivery(format!("provider request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DispatchError::Delivery(format!(
                "provider returned HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        tracing::info!("Emergency alert sent to {} via provider API", email.recipient);
        Ok(DispatchReceipt {
            delivered: true,
            transport: self.transport_name(),
            recipient: email.recipient,
        })
    }
}
