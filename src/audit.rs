//! Redaction audit trail.
//!
//! Every redacted view produces exactly one record. Records carry the
//! categories that were redacted and the toggles in force, never the
//! matched values. The log is append-only and can forward records to
//! pluggable sinks (a JSON-lines file, a database writer, ...).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::redact::{RedactionCategory, RedactionOptions};

/// A sink that receives audit records. Implement this to forward records
/// to a file, database, or other persistent store.
pub trait AuditSink: Send {
    /// Append a record. Called once per redacted view.
    fn append(&mut self, record: AuditRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Redact,
}

/// The kind of record whose text was redacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Patient,
    Transcript,
    SoapNote,
    ClinicalExtraction,
}

/// The toggles a redaction ran with. Custom patterns are counted, not
/// copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedOptions {
    pub redact_names: bool,
    pub redact_dates: bool,
    pub redact_phone: bool,
    pub redact_email: bool,
    #[serde(rename = "redactSSN")]
    pub redact_ssn: bool,
    pub redact_address: bool,
    pub custom_patterns: usize,
}

impl From<&RedactionOptions> for AppliedOptions {
    fn from(options: &RedactionOptions) -> Self {
        Self {
            redact_names: options.redact_names,
            redact_dates: options.redact_dates,
            redact_phone: options.redact_phone,
            redact_email: options.redact_email,
            redact_ssn: options.redact_ssn,
            redact_address: options.redact_address,
            custom_patterns: options.custom_patterns.len(),
        }
    }
}

/// A permanent record of one redaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    /// Who asked for the view, if known.
    pub actor_id: Option<String>,
    pub session_id: Option<String>,
    /// The patient whose PHI was hidden.
    pub patient_id: Option<String>,
    /// One entry per redacted item, in item order.
    pub redacted_categories: Vec<RedactionCategory>,
    pub options: AppliedOptions,
    pub timestamp: DateTime<Utc>,
}

/// An append-only log of redaction events.
/// Can forward records to additional sinks via `add_forward_sink`.
#[derive(Default, Serialize, Deserialize)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    #[serde(skip)]
    forward_sinks: Vec<Box<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("records", &self.records)
            .field("forward_sinks", &self.forward_sinks.len())
            .finish()
    }
}

impl Clone for AuditLog {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            forward_sinks: Vec::new(), // Forward sinks are not cloned
        }
    }
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to receive a copy of every record.
    pub fn add_forward_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.forward_sinks.push(sink);
    }

    /// Append a new record to the log and forward to any attached sinks.
    pub fn append(&mut self, record: AuditRecord) {
        debug!(
            resource_type = ?record.resource_type,
            items = record.redacted_categories.len(),
            "appending redaction audit record"
        );
        for sink in self.forward_sinks.iter_mut() {
            sink.append(record.clone());
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditRecord> {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Built-in sink: file
// ---------------------------------------------------------------------------

/// Writes audit records as JSON lines (one per record) to a file.
/// Creates the file if it doesn't exist; appends if it does.
pub struct FileAuditSink {
    file: std::fs::File,
}

impl FileAuditSink {
    /// Open or create a file for append-only audit logging.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl AuditSink for FileAuditSink {
    fn append(&mut self, record: AuditRecord) {
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to serialize audit record");
                return;
            }
        };
        if let Err(err) = writeln!(self.file, "{line}").and_then(|_| self.file.flush()) {
            warn!(error = %err, "failed to write audit record");
        }
    }
}
