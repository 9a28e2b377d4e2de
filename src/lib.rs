//! # phivault
//!
//! Field-level encryption-at-rest and PHI redaction for clinical text.
//!
//! Two independent components:
//!
//! - the **codec** ([`FieldCodec`]) seals single column values with
//!   AES-256-GCM into `iv:tag:ciphertext` hex envelopes, and
//!   [`EncryptedColumn`] applies it at the persistence boundary while
//!   tolerating legacy plaintext rows;
//! - the **redaction engine** ([`redact`]) produces de-identified copies of
//!   text from patient identity and fixed PHI patterns.
//!
//! [`PhiVault`] wires both to a redaction audit log. Build it once at
//! start-up and pass it (or its codec) to whatever owns column mapping.
//!
//! ## Public API
//!
//! Only the items re-exported here and the public modules are intended for
//! callers. Cipher internals are `pub(crate)`.

pub mod audit;
pub(crate) mod codec;
pub(crate) mod column;
pub mod config;
pub(crate) mod crypto;
pub(crate) mod envelope;
pub mod error;
pub(crate) mod keys;
pub(crate) mod patterns;
pub mod redact;
pub mod view;

pub use codec::FieldCodec;
pub use column::EncryptedColumn;
pub use config::VaultConfig;
pub use envelope::{looks_encrypted, EncryptedEnvelope};
pub use error::{PhiVaultError, Result};
pub use keys::{generate_key, generate_key_base64, EncryptionKey};
pub use patterns::CustomPattern;
pub use redact::{
    redact_comprehensive, redact_patient_names, redact_text, PatientIdentity, RedactedItem,
    RedactionCategory, RedactionOptions, RedactionResult,
};
pub use view::{RedactedView, ViewRequest};

use audit::{AuditLog, AuditSink, FileAuditSink};

/// The process-wide PHI protection context: one codec, one audit log.
#[derive(Debug)]
pub struct PhiVault {
    codec: FieldCodec,
    audit: AuditLog,
}

impl PhiVault {
    pub fn new(key: EncryptionKey) -> Self {
        Self {
            codec: FieldCodec::new(key),
            audit: AuditLog::new(),
        }
    }

    /// Build from start-up configuration, attaching the audit file sink if
    /// one is configured.
    pub fn from_config(config: VaultConfig) -> Result<Self> {
        let mut vault = Self::new(config.encryption_key);
        if let Some(path) = config.audit_log_path {
            let sink = FileAuditSink::new(&path).map_err(|e| {
                PhiVaultError::Configuration(format!(
                    "cannot open audit log {}: {e}",
                    path.display()
                ))
            })?;
            vault.add_audit_sink(Box::new(sink));
        }
        Ok(vault)
    }

    /// Shorthand for `PhiVault::from_config(VaultConfig::from_env()?)`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(VaultConfig::from_env()?)
    }

    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }

    /// A column transformer bound to this vault's codec.
    pub fn column(&self) -> EncryptedColumn<'_> {
        EncryptedColumn::new(Some(&self.codec))
    }

    pub fn encrypt(&self, plaintext: Option<&str>) -> Result<Option<String>> {
        self.codec.encrypt(plaintext)
    }

    pub fn decrypt(&self, envelope: Option<&str>) -> Result<Option<String>> {
        self.codec.decrypt(envelope)
    }

    /// Produce a redacted view and append its audit record.
    pub fn view_redacted(&mut self, request: ViewRequest<'_>) -> Result<RedactedView> {
        view::view_redacted(request, &mut self.audit)
    }

    /// Forward every future audit record to `sink` as well.
    pub fn add_audit_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.audit.add_forward_sink(sink);
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }
}
