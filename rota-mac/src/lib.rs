//! # RotaKey MAC
//!
//! Message authentication over a rotating keyset.
//!
//! [`KeysetMac`] computes tags with the primary key (output prefix
//! prepended) and verifies by prefix-bucket candidate resolution, so
//! tags computed before a rotation keep verifying. Legacy-variant keys
//! authenticate a trailing `0x00` version byte after the message, a
//! wire-compatibility quirk confined entirely to this family.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// HMAC-SHA256 implementation of the [`Mac`] capability.
pub mod hmac_sha256;
/// The rotation wrapper over a frozen container.
pub mod keyset;

use thiserror::Error;

pub use hmac_sha256::{register_hmac_sha256, HmacSha256, HmacSha256Key, HMAC_SHA256_KEY_LEN};
pub use keyset::KeysetMac;

/// MAC capability: compute and verify authentication tags.
pub trait Mac: Send + Sync {
    /// Compute the tag for `data`.
    ///
    /// # Errors
    /// Returns an error if tag computation fails.
    fn compute(&self, data: &[u8]) -> Result<Vec<u8>, MacError>;

    /// Verify that `tag` authenticates `data`.
    ///
    /// # Errors
    /// Returns an error if the tag does not verify.
    fn verify(&self, tag: &[u8], data: &[u8]) -> Result<(), MacError>;
}

/// Errors from MAC operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MacError {
    /// Key length does not match the algorithm's requirement.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length provided.
        actual: usize,
    },

    /// Tag computation failed.
    #[error("tag computation failed: {0}")]
    ComputeFailed(String),

    /// Verification failed. Deliberately carries no detail about which
    /// key was tried or why it failed.
    #[error("invalid MAC")]
    InvalidTag,

    /// The keyset has no primary key, so it cannot compute tags.
    #[error("keyset has no primary key")]
    MissingPrimary,
}
