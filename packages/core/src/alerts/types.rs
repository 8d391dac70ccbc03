
use super::error::DispatchError;

/// Everything a hospital needs to act on an emergency report.
///
/// Fields are set once in [`EmergencyAlert::new`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyAlert {
    patient_identifier: String,
    hospital_recipient: String,
    contact_name: String,
    contact_phone: String,
    home_address: String,
    medical_conditions: String,
}

impl EmergencyAlert {
    pub fn new(
        patient_identifier: impl Into<String>,
        hospital_recipient: impl Into<String>,
        contact_name: impl Into<String>,
        contact_phone: impl Into<String>,
        home_address: impl Into<String>,
        medical_conditions: impl Into<String>,
    ) -> Self {
        Self {
            patient_identifier: patient_identifier.into(),
            hospital_recipient: hospital_recipient.into(),
            contact_name: contact_name.into(),
            contact_phone: contact_phone.into(),
            home_address: home_address.into(),
            medical_conditions: medical_conditions.into(),
        }
    }

    pub fn patient_identifier(&self) -> &str {
        &self.patient_identifier
    }

    pub fn hospital_recipient(&self) -> &str {
        &self.hospital_recipient
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    pub fn home_address(&self) -> &str {
        &self.home_address
    }

    pub fn medical_conditions(&self) -> &str {
        &self.medical_conditions
    }
}

/// Outcome of a successful delivery attempt.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub delivered: bool,
    pub transport: &'static str,
    pub recipient: String,
}

pub type DispatchResult = Result<DispatchReceipt, DispatchError>;
