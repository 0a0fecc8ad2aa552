//! # RotaKey Signature
//!
//! Public-key signature verification over a rotating keyset.
//!
//! This family is verify-only: the holder of a keyset of public keys
//! accepts signatures produced by any of its key versions. A
//! [`KeysetVerifier`] resolves candidates by the signature's leading
//! prefix bytes and falls back to the raw-key bucket, so signatures
//! made before a rotation keep verifying. Because nothing is produced,
//! a verifier keyset does not need a primary key.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Ed25519 verification.
pub mod ed25519;
/// The rotation wrapper over a frozen container.
pub mod keyset;
/// RSA-SSA-PSS verification.
pub mod rsa_pss;

use thiserror::Error;

pub use ed25519::{register_ed25519, Ed25519PublicKey, Ed25519Verify, ED25519_PUBLIC_KEY_LEN};
pub use keyset::KeysetVerifier;
pub use rsa_pss::{register_rsa_ssa_pss, PssAlgorithm, RsaSsaPssPublicKey, RsaSsaPssVerify};

/// Signature verification capability.
pub trait PublicKeyVerify: Send + Sync {
    /// Verify that `signature` is a valid signature over `data`.
    ///
    /// # Errors
    /// Returns an error if the signature does not verify.
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), SignatureError>;
}

/// Errors from signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SignatureError {
    /// The public key material was rejected.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// Verification failed. Deliberately carries no detail about which
    /// key was tried or why it failed.
    #[error("invalid signature")]
    InvalidSignature,
}
