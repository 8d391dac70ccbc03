//! Mail dispatcher interface and transport selection.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::DispatchError;
use super::provider_api::ProviderApiDispatcher;
use super::smtp::SmtpDispatcher;
use super::types::{DispatchResult, EmergencyAlert};
use crate::config::{EmailTransport, MailSettings};

/// Delivers an emergency alert through one concrete transport.
#[async_trait]
pub trait MailDispatcher {
    /// Short transport label for logs, metrics and the status probe.
    fn transport_name(&self) -> &'static str;

    /// Fails with [`DispatchError::MissingConfig`] when credentials are
    /// absent. Never touches the network.
    fn ensure_configured(&self) -> Result<(), DispatchError>;

    fn is_configured(&self) -> bool {
        self.ensure_configured().is_ok()
    }

    /// Compose and send the alert. One attempt, no retry.
    async fn dispatch(&self, alert: &EmergencyAlert) -> DispatchResult;
}

/// Build the dispatcher selected by `settings.transport`.
///
/// Missing credentials do not fail here: the service still starts and the
/// emergency endpoint reports the configuration error per request.
pub fn build_dispatcher(
    settings: &MailSettings,
) -> Result<Arc<dyn MailDispatcher + Send + Sync>, DispatchError> {
    let dispatcher: Arc<dyn MailDispatcher + Send + Sync> = match settings.transport {
        EmailTransport::Smtp => Arc::new(SmtpDispatcher::new(&settings.smtp, settings.timeout)?),
        EmailTransport::Api => {
            Arc::new(ProviderApiDispatcher::new(&settings.api, settings.timeout)?)
        }
    };

    if let Err(err) = dispatcher.ensure_configured() {
        tracing::warn!(
            "Emergency email via {} is unavailable: {}",
            dispatcher.transport_name(),
            err
        );
    }

    Ok(dispatcher)
}
