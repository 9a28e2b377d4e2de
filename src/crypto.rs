//! Low-level cryptographic operations.
//!
//! This module is the only place in the crate that touches the cipher and
//! the random number generator directly. Everything else encrypts and
//! decrypts through the functions exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption), no associated data
//! - **IV**: 128-bit (16 bytes), generated fresh per operation via `SystemRandom`
//! - **Tag**: 128-bit (16 bytes), kept detached from the ciphertext
//! - **Key size**: 256 bits (32 bytes)
//!
//! The 16-byte IV keeps envelopes readable by the Node service that wrote
//! the existing rows. `ring` only offers 96-bit GCM nonces, so the cipher
//! itself comes from `aes-gcm`, parameterised over the nonce size.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{PhiVaultError, Result};

/// AES-256-GCM with a 16-byte IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Size of the IV in bytes (128 bits).
pub const IV_LEN: usize = 16;

/// Size of the GCM authentication tag in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Size of a key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// The three pieces produced by one encryption.
pub(crate) struct Sealed {
    pub iv: [u8; IV_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

/// Generate a cryptographically secure random IV.
///
/// A fresh IV is generated for every encryption call. There is no caching
/// or counter-based generation.
fn generate_iv() -> Result<[u8; IV_LEN]> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| PhiVaultError::Randomness)?;
    Ok(iv)
}

fn cipher(key_bytes: &[u8; KEY_LEN]) -> Result<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key_bytes)
        .map_err(|_| PhiVaultError::Configuration("invalid key length".into()))
}

/// Encrypt a plaintext payload using AES-256-GCM under a fresh IV.
pub(crate) fn encrypt(key_bytes: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = cipher(key_bytes)?;
    let iv = generate_iv()?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|e| PhiVaultError::Encryption(e.to_string()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(Sealed {
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt and verify a ciphertext using AES-256-GCM.
///
/// IV and tag lengths are checked before the cipher runs. A tag that fails
/// verification is reported as `Authentication` and the caller receives no
/// partial plaintext.
pub(crate) fn decrypt(
    key_bytes: &[u8; KEY_LEN],
    iv: &[u8],
    tag: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    if iv.len() != IV_LEN {
        return Err(PhiVaultError::Decryption(format!(
            "invalid IV length: expected {IV_LEN}, got {}",
            iv.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(PhiVaultError::Decryption(format!(
            "invalid authentication tag length: expected {TAG_LEN}, got {}",
            tag.len()
        )));
    }

    let cipher = cipher(key_bytes)?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| PhiVaultError::Authentication)?;

    Ok(buffer)
}

/// Generate a cryptographically secure random key.
pub(crate) fn generate_random_key() -> Result<[u8; KEY_LEN]> {
    let rng = SystemRandom::new();
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key).map_err(|_| PhiVaultError::Randomness)?;
    Ok(key)
}
