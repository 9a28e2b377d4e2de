//! The external representation of one encrypted field value.
//!
//! ```text
//! <ivHex>:<authTagHex>:<ciphertextHex>
//! ```
//!
//! No version byte and no other metadata: this is the format already stored
//! in existing text columns, so it cannot grow fields.

use std::fmt;

use crate::crypto::Sealed;
use crate::error::{PhiVaultError, Result};

const SEPARATOR: char = ':';

/// A decoded envelope. Lengths are validated by the cipher, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub iv: Vec<u8>,
    pub tag: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Split and hex-decode an envelope string.
    ///
    /// Anything other than exactly three `:`-separated parts is a `Format`
    /// error. A part that is not valid hex is a `Decryption` error.
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split(SEPARATOR).collect();
        let [iv, tag, ciphertext] = parts.as_slice() else {
            return Err(PhiVaultError::Format);
        };

        Ok(Self {
            iv: decode_part("IV", iv)?,
            tag: decode_part("authentication tag", tag)?,
            ciphertext: decode_part("ciphertext", ciphertext)?,
        })
    }
}

fn decode_part(name: &str, part: &str) -> Result<Vec<u8>> {
    hex::decode(part).map_err(|_| PhiVaultError::Decryption(format!("{name} is not valid hex")))
}

impl From<Sealed> for EncryptedEnvelope {
    fn from(sealed: Sealed) -> Self {
        Self {
            iv: sealed.iv.to_vec(),
            tag: sealed.tag.to_vec(),
            ciphertext: sealed.ciphertext,
        }
    }
}

impl fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(&self.iv),
            hex::encode(&self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

/// Shape check used to tell encrypted rows from legacy plaintext rows.
///
/// True iff the value has exactly two `:` separators. Plaintext that happens
/// to contain two colons also passes. Callers decrypting on this signal
/// must tolerate failure.
pub fn looks_encrypted(value: &str) -> bool {
    value.split(SEPARATOR).count() == 3
}
