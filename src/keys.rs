//! Key material ownership and decoding.
//!
//! The process holds exactly one field-encryption key. It is decoded once
//! from configuration at start-up and never written anywhere by this crate.
//!
//! Accepted encodings:
//! - 64 hexadecimal characters
//! - 44 characters of standard, padded base64
//!
//! Both must decode to exactly 32 bytes.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{self, KEY_LEN};
use crate::error::{PhiVaultError, Result};

/// Length of a hex-encoded key.
const HEX_KEY_LEN: usize = KEY_LEN * 2;

/// The field-encryption key.
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop.
/// - `Debug` never prints key bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    /// Construct a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Decode key material as supplied through `ENCRYPTION_KEY`.
    ///
    /// A 64-character value is read as hex, anything else as base64. The
    /// decoded length must be 32 bytes.
    pub fn parse(material: &str) -> Result<Self> {
        let material = material.trim();
        if material.is_empty() {
            return Err(PhiVaultError::Configuration(
                "encryption key is required".into(),
            ));
        }

        let mut decoded = if material.len() == HEX_KEY_LEN {
            hex::decode(material).map_err(|_| {
                PhiVaultError::Configuration("encryption key is not valid hex".into())
            })?
        } else {
            STANDARD.decode(material).map_err(|_| {
                PhiVaultError::Configuration("encryption key is not valid base64".into())
            })?
        };

        if decoded.len() != KEY_LEN {
            let got = decoded.len();
            decoded.zeroize();
            return Err(PhiVaultError::Configuration(format!(
                "encryption key must be {KEY_LEN} bytes (64 hex chars or 44 base64 chars), got {got}"
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Borrow the raw key bytes for the cipher.
    ///
    /// `pub(crate)`: raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Generate a fresh random key, hex encoded, for operator provisioning.
///
/// Pure utility: it does not touch any key the process already holds.
pub fn generate_key() -> Result<String> {
    let mut bytes = crypto::generate_random_key()?;
    let encoded = hex::encode(bytes);
    bytes.zeroize();
    Ok(encoded)
}

/// Same as [`generate_key`], base64 encoded (44 characters).
pub fn generate_key_base64() -> Result<String> {
    let mut bytes = crypto::generate_random_key()?;
    let encoded = STANDARD.encode(bytes);
    bytes.zeroize();
    Ok(encoded)
}
