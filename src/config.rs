//! Start-up configuration.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ENCRYPTION_KEY` | 32-byte field key, 64 hex or 44 base64 chars | Required |
//! | `PHIVAULT_AUDIT_LOG` | JSON-lines file receiving redaction audit records | Unset |
//!
//! A missing or malformed key is fatal: the process must not serve traffic
//! that touches encrypted columns without one.

use std::path::PathBuf;

use crate::error::{PhiVaultError, Result};
use crate::keys::EncryptionKey;

/// Environment variable holding the field-encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Environment variable naming the audit log file.
pub const AUDIT_LOG_ENV: &str = "PHIVAULT_AUDIT_LOG";

#[derive(Debug)]
pub struct VaultConfig {
    pub encryption_key: EncryptionKey,
    pub audit_log_path: Option<PathBuf>,
}

impl VaultConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let material = lookup(ENCRYPTION_KEY_ENV).ok_or_else(|| {
            PhiVaultError::Configuration(format!(
                "{ENCRYPTION_KEY_ENV} environment variable is required"
            ))
        })?;
        let encryption_key = EncryptionKey::parse(&material)?;

        let audit_log_path = lookup(AUDIT_LOG_ENV)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            encryption_key,
            audit_log_path,
        })
    }
}
