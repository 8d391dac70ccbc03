//! Alert message composition, shared by every transport.

use chrono::{DateTime, Utc};

use super::types::EmergencyAlert;

/// A rendered alert: one subject, a plain-text body and an HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    pub recipient: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl AlertEmail {
    pub fn compose(alert: &EmergencyAlert) -> Self {
        Self::compose_at(alert, Utc::now())
    }

    pub fn compose_at(alert: &EmergencyAlert, reported_at: DateTime<Utc>) -> Self {
        let subject = format!(
            "URGENT: Medical Emergency Alert for {}",
            alert.patient_identifier()
        );
        let reported = reported_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

        let text = format!(
            "URGENT MEDICAL EMERGENCY\n\
             \n\
             Remedi flagged a possible emergency for one of your patients.\n\
             \n\
             Patient: {}\n\
             Home address: {}\n\
             Medical conditions: {}\n\
             Emergency contact: {}\n\
             Contact phone: {}\n\
             Hospital: {}\n\
             Reported at: {}\n\
             \n\
             Please contact the patient or their emergency contact immediately.\n",
            alert.patient_identifier(),
            alert.home_address(),
            alert.medical_conditions(),
            alert.contact_name(),
            alert.contact_phone(),
            alert.hospital_recipient(),
            reported,
        );

        let rows = [
            ("Patient", alert.patient_identifier()),
            ("Home address", alert.home_address()),
            ("Medical conditions", alert.medical_conditions()),
            ("Emergency contact", alert.contact_name()),
            ("Contact phone", alert.contact_phone()),
            ("Hospital", alert.hospital_recipient()),
            ("Reported at", reported.as_str()),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style=\"padding:4px 12px 4px 0\"><strong>{}</strong></td><td>{}</td></tr>",
                label,
                escape_html(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

        let html = format!(
            "<html><body style=\"font-family:Arial,sans-serif\">\n\
             <h2 style=\"color:#c0392b\">URGENT MEDICAL EMERGENCY</h2>\n\
             <p>Remedi flagged a possible emergency for one of your patients.</p>\n\
             <table>\n{}\n</table>\n\
             <p><strong>Please contact the patient or their emergency contact immediately.</strong></p>\n\
             </body></html>",
            rows
        );

        Self {
            recipient: alert.hospital_recipient().to_string(),
            subject,
            text,
            html,
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample_alert() -> EmergencyAlert {
        EmergencyAlert::new(
            "jane.doe@example.com",
            "er@cityhospital.example",
            "John Doe",
            "+1 555 0100",
            "12 Elm Street, Springfield",
            "Type 1 diabetes, penicillin allergy",
        )
    }

    #[test]
    fn subject_is_urgent_and_names_patient() {
        let email = AlertEmail::compose(&sample_alert());
        assert!(email.subject.contains("URGENT"));
        assert!(email.subject.contains("jane.doe@example.com"));
        assert_eq!(email.recipient, "er@cityhospital.example");
    }

    #[test]
    fn both_bodies_carry_every_field() {
        let alert = sample_alert();
        let email = AlertEmail::compose(&alert);
        for field in [
            alert.patient_identifier(),
            alert.hospital_recipient(),
            alert.contact_name(),
            alert.contact_phone(),
            alert.home_address(),
            alert.medical_conditions(),
        ] {
            assert!(email.text.contains(field), "text body missing {field}");
            assert!(email.html.contains(field), "html body missing {field}");
        }
    }

    #[test]
    fn timestamp_is_rendered_in_utc() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let email = AlertEmail::compose_at(&sample_alert(), at);
        assert!(email.text.contains("Reported at: 2026-03-14 09:26:53 UTC"));
    }

    #[test]
    fn html_body_escapes_markup_in_fields() {
        let alert = EmergencyAlert::new("p", "h@example.com", "<script>", "1", "A & B", "x");
        let email = AlertEmail::compose(&alert);
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("A &amp; B"));
        assert!(!email.html.contains("<script>"));
        assert!(email.text.contains("<script>"));
    }

    #[test]
    fn empty_fields_still_compose() {
        let alert = EmergencyAlert::new("", "h@example.com", "", "", "", "");
        let email = AlertEmail::compose(&alert);
        assert!(email.text.contains("Patient: \n"));
    }

    proptest! {
        #[test]
        fn fields_appear_verbatim_in_text_body(
            patient in "[A-Za-z0-9@._ -]{0,40}",
            contact in "[A-Za-z .'-]{0,40}",
            phone in "[0-9+() -]{0,20}",
            address in "[A-Za-z0-9 ,.#-]{0,60}",
            conditions in "[A-Za-z0-9 ,.;()-]{0,80}",
        ) {
            let alert = EmergencyAlert::new(
                patient.clone(), "er@example.com", contact.clone(), phone.clone(),
                address.clone(), conditions.clone(),
            );
            let email = AlertEmail::compose(&alert);
            for field in [&patient, &contact, &phone, &address, &conditions] {
                prop_assert!(email.text.contains(field.as_str()));
            }
        }
    }
}
