//! Error types for phivault.
//!
//! Each variant is a distinct failure mode of the codec or the redaction
//! engine. Messages say *what* failed and never carry plaintext, key bytes
//! or matched PHI values.

use thiserror::Error;

/// The single error type for all phivault operations.
#[derive(Debug, Error)]
pub enum PhiVaultError {
    /// Key material was missing or malformed, or a custom redaction pattern
    /// did not compile.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An encrypted envelope did not split into exactly three parts.
    #[error("invalid encrypted data format")]
    Format,

    /// The GCM authentication tag did not verify. Either the envelope was
    /// tampered with or it was sealed under a different key.
    #[error("authentication tag verification failed")]
    Authentication,

    /// The cipher refused to encrypt.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed for a reason other than tag verification
    /// (bad hex, wrong IV or tag length, non-UTF-8 plaintext).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The system's random number generator failed to produce bytes.
    #[error("randomness source failed")]
    Randomness,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PhiVaultError>;
