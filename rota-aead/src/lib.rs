//! # RotaKey AEAD
//!
//! Authenticated encryption with associated data over a rotating keyset.
//!
//! [`KeysetAead`] wraps a frozen primitive container: new ciphertexts are
//! produced by the primary key and carry its output prefix; decryption
//! resolves candidates by prefix bucket (explicit prefixes first, raw
//! keys as fallback) and tries them in insertion order, so ciphertexts
//! produced before a rotation keep decrypting.
//!
//! ## Security Notes
//!
//! - All candidates failing is reported as one generic error that does
//!   not reveal which keys were tried or why they failed
//! - Nonces are random per encryption and never reused with a key
//! - The authentication tag is verified before any plaintext is released

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// AES-256-GCM implementation of the [`Aead`] capability.
pub mod aes_gcm;
/// The rotation wrapper over a frozen container.
pub mod keyset;

use thiserror::Error;

pub use aes_gcm::{register_aes_gcm, AesGcmAead, AesGcmKey, AES_256_GCM_KEY_LEN};
pub use keyset::KeysetAead;

/// AEAD capability: encrypt and decrypt with associated data.
///
/// Implementations must be safe to call from many threads at once.
pub trait Aead: Send + Sync {
    /// Encrypt `plaintext`, authenticating `associated_data` alongside
    /// it.
    ///
    /// # Errors
    /// Returns an error if encryption fails.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError>;

    /// Decrypt `ciphertext`, verifying `associated_data`.
    ///
    /// # Errors
    /// Returns an error if authentication or decryption fails.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError>;
}

/// Errors from AEAD operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AeadError {
    /// Key length does not match the cipher's requirement.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length provided.
        actual: usize,
    },

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption or authentication failed. Deliberately carries no
    /// detail about which key was tried or what went wrong.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The keyset has no primary key, so it cannot produce ciphertexts.
    #[error("keyset has no primary key")]
    MissingPrimary,
}
