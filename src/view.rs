//! Redacted views of stored clinical text.
//!
//! This is the only path by which a de-identified copy leaves the crate
//! with an audit record attached:
//! 1. Identity redaction (if the patient is known and names are enabled)
//! 2. Pattern redaction
//! 3. Append one audit record (categories only)

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audit::{AppliedOptions, AuditAction, AuditLog, AuditRecord, ResourceType};
use crate::error::Result;
use crate::redact::{self, PatientIdentity, RedactionOptions};

/// What the caller wants redacted, and on whose behalf.
#[derive(Debug, Clone)]
pub struct ViewRequest<'a> {
    pub text: &'a str,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub actor_id: Option<String>,
    pub session_id: Option<String>,
    pub patient_id: Option<String>,
    pub patient: Option<&'a PatientIdentity>,
    pub options: RedactionOptions,
}

impl<'a> ViewRequest<'a> {
    /// A transcript view with default options.
    pub fn transcript(text: &'a str) -> Self {
        Self {
            text,
            resource_type: ResourceType::Transcript,
            resource_id: None,
            actor_id: None,
            session_id: None,
            patient_id: None,
            patient: None,
            options: RedactionOptions::default(),
        }
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn actor_id(mut self, id: impl Into<String>) -> Self {
        self.actor_id = Some(id.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn patient_id(mut self, id: impl Into<String>) -> Self {
        self.patient_id = Some(id.into());
        self
    }

    pub fn patient(mut self, patient: &'a PatientIdentity) -> Self {
        self.patient = Some(patient);
        self
    }

    pub fn options(mut self, options: RedactionOptions) -> Self {
        self.options = options;
        self
    }
}

/// The response body of a redacted view. Lengths are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedView {
    pub redacted_text: String,
    pub redacted_items_count: usize,
    pub original_length: usize,
    pub redacted_length: usize,
}

/// Redact `request.text` and record the event in `audit`.
///
/// No record is written if redaction fails.
pub fn view_redacted(request: ViewRequest<'_>, audit: &mut AuditLog) -> Result<RedactedView> {
    let patient = request.patient.filter(|_| request.options.redact_names);
    let result = redact::redact_comprehensive(request.text, patient, &request.options)?;

    audit.append(AuditRecord {
        action: AuditAction::Redact,
        resource_type: request.resource_type,
        resource_id: request.resource_id,
        actor_id: request.actor_id,
        session_id: request.session_id,
        patient_id: request.patient_id,
        redacted_categories: result.categories(),
        options: AppliedOptions::from(&request.options),
        timestamp: Utc::now(),
    });

    Ok(RedactedView {
        redacted_items_count: result.redacted_items.len(),
        original_length: request.text.chars().count(),
        redacted_length: result.redacted_text.chars().count(),
        redacted_text: result.redacted_text,
    })
}
