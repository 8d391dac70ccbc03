use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::dispatcher::MailDispatcher;
use super::error::DispatchError;
use super::message::AlertEmail;
use super::types::{DispatchReceipt, DispatchResult, EmergencyAlert};
use crate::config::{SmtpSettings, SmtpTls};

/// Authenticated SMTP submission.
pub struct SmtpDispatcher {
    /// `None` when username or password is missing.
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<String>,
}

impl SmtpDispatcher {
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> Result<Self, DispatchError> {
        let transport = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                let creds = Credentials::new(username.clone(), password.expose().to_string());
                Some(build_transport(settings, creds, timeout)?)
            }
            _ => None,
        };

        Ok(Self {
            transport,
            from: settings.from.clone(),
        })
    }

    fn ready_transport(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>, DispatchError> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            DispatchError::MissingConfig("SMTP_USERNAME and SMTP_PASSWORD must be set".to_string())
        })?;
        if self.from.is_none() {
            return Err(DispatchError::MissingConfig("SMTP_FROM is not set".to_string()));
        }
        Ok(transport)
    }

    fn build_message(&self, email: &AlertEmail) -> Result<Message, DispatchError> {
        let from = self
            .from
            .as_deref()
            .ok_or_else(|| DispatchError::MissingConfig("SMTP_FROM is not set".to_string()))?;

        let from_mailbox = format!("Remedi Alerts <{}>", from)
            .parse::<Mailbox>()
            .map_err(|err| DispatchError::InvalidAddress(format!("sender {}: {}", from, err)))?;
        let to_mailbox = email.recipient.parse::<Mailbox>().map_err(|err| {
            DispatchError::InvalidAddress(format!("recipient {}: {}", email.recipient, err))
        })?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|err| DispatchError::Build(err.to_string()))
    }
}

fn build_transport(
    settings: &SmtpSettings,
    creds: Credentials,
    timeout: Duration,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, DispatchError> {
    let builder = match settings.tls {
        SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host),
        SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host),
        SmtpTls::None => {
            tracing::warn!("SMTP TLS disabled - credentials will be sent in plaintext");
            Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &settings.host,
            ))
        }
    }
    .map_err(|err| {
        DispatchError::Build(format!("invalid SMTP relay {}: {}", settings.host, err))
    })?;

    Ok(builder
        .port(settings.port)
        .credentials(creds)
        .authentication(vec![Mechanism::Plain, Mechanism::Login])
        .timeout(Some(timeout))
        .build())
}

#[async_trait]
impl MailDispatcher for SmtpDispatcher {
    fn transport_name(&self) -> &'static str {
        "smtp"
    }

    fn ensure_configured(&self) -> Result<(), DispatchError> {
        self.ready_transport().map(|_| ())
    }

    async fn dispatch(&self, alert: &EmergencyAlert) -> DispatchResult {
        let transport = self.ready_transport()?;

        let email = AlertEmail::compose(alert);
        let message = self.build_message(&email)?;

        transport
            .send(message)
            .await
            .map_err(|err| DispatchError::Delivery(format!("SMTP submission failed: {}", err)))?;

        tracing::info!("Emergency alert sent to {} via SMTP", email.recipient);
        Ok(DispatchReceipt {
            delivered: true,
            transport: self.transport_name(),
            recipient: email.recipient,
        })
    }
}
