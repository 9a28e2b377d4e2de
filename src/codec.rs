//! Field-level encryption codec.
//!
//! Turns a plaintext column value into a tamper-evident envelope string and
//! back. Empty values pass through untouched so that an empty column never
//! reveals envelope structure.

use crate::crypto;
use crate::envelope::EncryptedEnvelope;
use crate::error::{PhiVaultError, Result};
use crate::keys::EncryptionKey;

/// AES-256-GCM codec bound to the process key.
///
/// Immutable after construction and safe to share across threads.
#[derive(Debug)]
pub struct FieldCodec {
    key: EncryptionKey,
}

impl FieldCodec {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Decode `material` and build a codec from it.
    pub fn from_key_material(material: &str) -> Result<Self> {
        EncryptionKey::parse(material).map(Self::new)
    }

    /// Encrypt one value. `None` and `""` are returned unchanged.
    pub fn encrypt(&self, plaintext: Option<&str>) -> Result<Option<String>> {
        match plaintext {
            None => Ok(None),
            Some("") => Ok(Some(String::new())),
            Some(text) => self.encrypt_str(text).map(Some),
        }
    }

    /// Decrypt one value. `None` and `""` are returned unchanged.
    pub fn decrypt(&self, envelope: Option<&str>) -> Result<Option<String>> {
        match envelope {
            None => Ok(None),
            Some("") => Ok(Some(String::new())),
            Some(value) => self.decrypt_str(value).map(Some),
        }
    }

    /// Encrypt a non-optional value. An empty string still passes through.
    pub fn encrypt_str(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let sealed = crypto::encrypt(self.key.as_bytes(), plaintext.as_bytes())?;
        Ok(EncryptedEnvelope::from(sealed).to_string())
    }

    /// Decrypt a non-optional value. An empty string still passes through.
    pub fn decrypt_str(&self, value: &str) -> Result<String> {
        if value.is_empty() {
            return Ok(String::new());
        }
        let envelope = EncryptedEnvelope::parse(value)?;
        let plaintext = crypto::decrypt(
            self.key.as_bytes(),
            &envelope.iv,
            &envelope.tag,
            &envelope.ciphertext,
        )?;
        String::from_utf8(plaintext)
            .map_err(|_| PhiVaultError::Decryption("plaintext is not valid UTF-8".into()))
    }
}
