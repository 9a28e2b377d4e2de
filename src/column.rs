//! Column value transformer for the persistence boundary.
//!
//! The ORM calls `to_db` on write and `from_db` on read of every protected
//! column. The codec is handed in at construction. There is no global
//! holder to populate before entities load.

use tracing::warn;

use crate::codec::FieldCodec;
use crate::envelope::looks_encrypted;
use crate::error::Result;

/// Encrypts on write and decrypts on read, tolerating legacy plaintext.
///
/// With no codec (migrations, local setup) values are stored and read as
/// plaintext.
#[derive(Debug, Clone, Copy)]
pub struct EncryptedColumn<'a> {
    codec: Option<&'a FieldCodec>,
}

impl<'a> EncryptedColumn<'a> {
    pub fn new(codec: Option<&'a FieldCodec>) -> Self {
        Self { codec }
    }

    /// Transform a value on its way into the database.
    pub fn to_db(&self, value: Option<&str>) -> Result<Option<String>> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(value.map(str::to_owned));
        };

        match self.codec {
            Some(codec) => codec.encrypt_str(value).map(Some),
            None => {
                warn!("field codec not configured, storing plaintext");
                Ok(Some(value.to_owned()))
            }
        }
    }

    /// Transform a value on its way out of the database.
    ///
    /// Never fails: a value that looks encrypted but does not decrypt is
    /// returned as stored, on the assumption that it predates encryption.
    pub fn from_db(&self, value: Option<&str>) -> Option<String> {
        let value = value?;
        if value.is_empty() {
            return Some(String::new());
        }

        let Some(codec) = self.codec else {
            return Some(value.to_owned());
        };

        if !looks_encrypted(value) {
            return Some(value.to_owned());
        }

        match codec.decrypt_str(value) {
            Ok(plaintext) => Some(plaintext),
            Err(err) => {
                warn!(error = %err, "decryption failed, returning stored value as-is");
                Some(value.to_owned())
            }
        }
    }
}
