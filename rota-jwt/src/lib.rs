//! # RotaKey JWT
//!
//! JWT (RFC 7519) verification over a rotating keyset.
//!
//! JWTs carry no binary output prefix, so candidate resolution works
//! differently here than in the byte-oriented families: key selection
//! goes through the JOSE `kid` and `alg` headers, and the keyset
//! wrapper tries every entry in keyset order. A key whose headers do
//! not match the token simply declines; claim validation only runs
//! after a signature has verified, and its failures are reported
//! precisely because at that point the token is authentic.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Compact JWS parsing and the `kid` derivation rule.
pub mod format;
/// Claim validation.
pub mod validator;
/// Per-key and keyset verifiers.
pub mod verify;

use thiserror::Error;

pub use format::{decode_segment, derive_kid, split_compact, CompactParts};
pub use validator::{JwtValidator, JwtValidatorBuilder, RawJwt, VerifiedJwt};
pub use verify::{
    register_jwt_verifiers, JwtEd25519PublicKey, JwtPublicKeyVerify, JwtRsaSsaPssPublicKey,
    JwtVerifier, KeysetJwtVerifier,
};

/// Errors from JWT parsing and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum JwtError {
    /// The token is not a parseable compact JWS.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// No key accepted the token. Deliberately carries no detail about
    /// which keys were tried or why they declined.
    #[error("JWT verification failed")]
    InvalidToken,

    /// The signature verified but the token's claims are not
    /// acceptable. Safe to report precisely: the token is authentic.
    #[error("invalid claim: {0}")]
    Validation(String),
}
