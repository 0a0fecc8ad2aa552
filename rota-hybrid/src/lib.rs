//! # RotaKey Hybrid
//!
//! Hybrid public-key encryption over a rotating keyset.
//!
//! The construction is KEM/DEM: an X25519-HKDF-SHA256 key
//! encapsulation (RFC 9180 DHKEM) produces a fresh 32-byte secret per
//! message, and AES-256-GCM carries the payload under that secret. A
//! hybrid ciphertext is `encapsulated key || DEM ciphertext`, with the
//! keyset wrapper prepending the producing key's output prefix.
//!
//! Encryption needs only the recipient's public keys; decryption holds
//! the private keys and resolves candidates by prefix like the other
//! byte-oriented families.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Rotation wrappers over frozen containers.
pub mod keyset;
/// X25519 + AES-256-GCM hybrid primitives and key descriptors.
pub mod x25519_aes_gcm;
/// X25519-HKDF-SHA256 key encapsulation (RFC 9180 DHKEM).
pub mod x25519_kem;

use thiserror::Error;

pub use keyset::{KeysetHybridDecrypt, KeysetHybridEncrypt};
pub use x25519_aes_gcm::{
    register_x25519_hybrid_decrypt, register_x25519_hybrid_encrypt, X25519HybridDecrypt,
    X25519HybridEncrypt, X25519HybridPrivateKey, X25519HybridPublicKey,
};
pub use x25519_kem::{KemError, X25519HkdfSha256Kem, X25519KemKeyPair, X25519_KEY_LEN};

/// Hybrid encryption capability: public-key encryption bound to a
/// caller-chosen context.
pub trait HybridEncrypt: Send + Sync {
    /// Encrypt `plaintext` bound to `context_info`.
    ///
    /// # Errors
    /// Returns an error if encapsulation or payload encryption fails.
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError>;
}

/// Hybrid decryption capability.
pub trait HybridDecrypt: Send + Sync {
    /// Decrypt `ciphertext` bound to `context_info`.
    ///
    /// # Errors
    /// Returns an error if no key decrypts the ciphertext.
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError>;
}

/// Errors from hybrid encryption operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HybridError {
    /// Key encapsulation failed.
    #[error(transparent)]
    Kem(#[from] KemError),

    /// Payload encryption failed.
    #[error("hybrid encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed. Deliberately carries no detail about which
    /// key was tried or why it failed.
    #[error("hybrid decryption failed")]
    DecryptionFailed,

    /// The keyset has no primary key, so it cannot encrypt.
    #[error("keyset has no primary key")]
    MissingPrimary,
}
