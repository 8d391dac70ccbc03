//! `POST /emergency-email`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::extract::parse_body;
use super::AppState;
use crate::alerts::EmergencyAlert;
use crate::error::AppError;

/// Wire shape of the alert. Every field must be present; empty strings pass.
#[derive(Debug, Deserialize)]
pub struct EmergencyEmailRequest {
    pub patient_email: String,
    pub hospital_email: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub home_address: String,
    pub medical_conditions: String,
}

impl From<EmergencyEmailRequest> for EmergencyAlert {
    fn from(req: EmergencyEmailRequest) -> Self {
        EmergencyAlert::new(
            req.patient_email,
            req.hospital_email,
            req.contact_name,
            req.contact_phone,
            req.home_address,
            req.medical_conditions,
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmergencyEmailResponse {
    pub status: String,
    pub message: String,
}

pub async fn emergency_email(
    State(state): State<AppState>,
    payload: Result<Json<EmergencyEmailRequest>, JsonRejection>,
) -> Result<Json<EmergencyEmailResponse>, AppError> {
    let request = parse_body(payload)?;
    let transport = state.mailer.transport_name();

    if let Err(err) = state.mailer.ensure_configured() {
        state.metrics.record_alert(transport, "not_configured");
        return Err(err.into());
    }

    let alert = EmergencyAlert::from(request);
    tracing::info!("Dispatching emergency alert via {}", transport);
    tracing::debug!(
        "Alert for {} addressed to {}",
        alert.patient_identifier(),
        alert.hospital_recipient()
    );

    match state.mailer.dispatch(&alert).await {
        Ok(receipt) => {
            state.metrics.record_alert(transport, "delivered");
            Ok(Json(EmergencyEmailResponse {
                status: "success".to_string(),
                message: format!("Emergency alert sent to {}", receipt.recipient),
            }))
        }
        Err(err) => {
            state.metrics.record_alert(transport, "failed");
            Err(err.into())
        }
    }
}
