#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Per-key and keyset JWT verification.
//!
//! A per-key [`JwtVerifier`] accepts a token only if the `alg` header
//! names its algorithm and, when the key is bound to a `kid`, the
//! header carries exactly that `kid`. The signature is checked before
//! the header is even parsed; header mismatches and signature failures
//! both surface as the generic [`JwtError::InvalidToken`] so a
//! declining key reveals nothing, while claim failures after a valid
//! signature are precise.

use std::sync::Arc;

use rota_core::{PrimitiveRegistry, PrimitiveSet};
use rota_signature::{
    Ed25519PublicKey, Ed25519Verify, PssAlgorithm, PublicKeyVerify, RsaSsaPssPublicKey,
    RsaSsaPssVerify,
};
use rota_types::KeyDescriptor;

use crate::format::{decode_segment, parse_json_object, split_compact};
use crate::validator::{JwtValidator, RawJwt, VerifiedJwt};
use crate::JwtError;

/// JWT verification capability.
pub trait JwtPublicKeyVerify: Send + Sync {
    /// Verify a compact token's signature and validate its claims.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, no key accepts it,
    /// or its claims fail validation.
    fn verify_and_decode(
        &self,
        compact: &str,
        validator: &JwtValidator,
    ) -> Result<VerifiedJwt, JwtError>;
}

/// A single-key JWT verifier: one signature key, one `alg` value, and
/// an optional bound `kid`.
pub struct JwtVerifier {
    verifier: Box<dyn PublicKeyVerify>,
    algorithm: String,
    kid: Option<String>,
}

impl JwtVerifier {
    /// Bind a signature verifier to a JOSE algorithm name and an
    /// optional `kid`.
    #[must_use]
    pub fn new(
        verifier: Box<dyn PublicKeyVerify>,
        algorithm: impl Into<String>,
        kid: Option<String>,
    ) -> Self {
        Self { verifier, algorithm: algorithm.into(), kid }
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithm", &self.algorithm)
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl JwtPublicKeyVerify for JwtVerifier {
    fn verify_and_decode(
        &self,
        compact: &str,
        validator: &JwtValidator,
    ) -> Result<VerifiedJwt, JwtError> {
        let parts = split_compact(compact)?;

        self.verifier
            .verify(&parts.signature, parts.signed.as_bytes())
            .map_err(|_e| JwtError::InvalidToken)?;

        let header = parse_json_object(&decode_segment(parts.header)?, "header")?;

        let alg = header.get("alg").and_then(serde_json::Value::as_str);
        if alg != Some(self.algorithm.as_str()) {
            return Err(JwtError::InvalidToken);
        }

        let header_kid = header.get("kid").and_then(serde_json::Value::as_str);
        if let Some(kid) = &self.kid {
            if header_kid != Some(kid.as_str()) {
                return Err(JwtError::InvalidToken);
            }
        }

        let raw = RawJwt::new(parse_json_object(&decode_segment(parts.payload)?, "payload")?);
        let type_header = header.get("typ").and_then(serde_json::Value::as_str);
        validator.validate(&raw, type_header)?;

        Ok(VerifiedJwt::new(raw, type_header.map(str::to_string)))
    }
}

/// Key descriptor for an Ed25519 JWT verification key (`alg: EdDSA`).
#[derive(Debug, Clone)]
pub struct JwtEd25519PublicKey {
    key: Ed25519PublicKey,
    kid: Option<String>,
}

impl JwtEd25519PublicKey {
    /// Bind an Ed25519 public key to an optional `kid`.
    #[must_use]
    pub fn new(key: Ed25519PublicKey, kid: Option<String>) -> Self {
        Self { key, kid }
    }
}

impl KeyDescriptor for JwtEd25519PublicKey {
    fn type_name(&self) -> &'static str {
        "JwtEd25519PublicKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Key descriptor for an RSA-SSA-PSS JWT verification key
/// (`alg: PS256/PS384/PS512` per the key's parameter set).
#[derive(Debug, Clone)]
pub struct JwtRsaSsaPssPublicKey {
    key: RsaSsaPssPublicKey,
    kid: Option<String>,
}

impl JwtRsaSsaPssPublicKey {
    /// Bind an RSA-SSA-PSS public key to an optional `kid`.
    #[must_use]
    pub fn new(key: RsaSsaPssPublicKey, kid: Option<String>) -> Self {
        Self { key, kid }
    }

    /// The JOSE `alg` value for this key's parameter set.
    #[must_use]
    pub fn algorithm_name(&self) -> &'static str {
        match self.key.algorithm() {
            PssAlgorithm::Sha256 => "PS256",
            PssAlgorithm::Sha384 => "PS384",
            PssAlgorithm::Sha512 => "PS512",
        }
    }
}

impl KeyDescriptor for JwtRsaSsaPssPublicKey {
    fn type_name(&self) -> &'static str {
        "JwtRsaSsaPssPublicKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Register the JWT verifier constructors with a registry.
pub fn register_jwt_verifiers(registry: &mut PrimitiveRegistry<Box<dyn JwtPublicKeyVerify>>) {
    registry.register::<JwtEd25519PublicKey, _>(|key| {
        let verifier = Box::new(Ed25519Verify::new(&key.key)) as Box<dyn PublicKeyVerify>;
        Ok(Box::new(JwtVerifier::new(verifier, "EdDSA", key.kid.clone()))
            as Box<dyn JwtPublicKeyVerify>)
    });
    registry.register::<JwtRsaSsaPssPublicKey, _>(|key| {
        let verifier = Box::new(RsaSsaPssVerify::new(&key.key)) as Box<dyn PublicKeyVerify>;
        Ok(Box::new(JwtVerifier::new(verifier, key.algorithm_name(), key.kid.clone()))
            as Box<dyn JwtPublicKeyVerify>)
    });
}

/// JWT verifier over every enabled key of a keyset.
///
/// Tokens carry no binary prefix, so every entry is offered the token
/// in keyset order; key selection happens through each entry's `alg`
/// and `kid` checks.
#[derive(Clone)]
pub struct KeysetJwtVerifier {
    primitives: Arc<PrimitiveSet<Box<dyn JwtPublicKeyVerify>>>,
}

impl KeysetJwtVerifier {
    /// Wrap a frozen container. A primary entry is permitted but not
    /// required.
    #[must_use]
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn JwtPublicKeyVerify>>>) -> Self {
        Self { primitives }
    }
}

impl std::fmt::Debug for KeysetJwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetJwtVerifier")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

impl JwtPublicKeyVerify for KeysetJwtVerifier {
    fn verify_and_decode(
        &self,
        compact: &str,
        validator: &JwtValidator,
    ) -> Result<VerifiedJwt, JwtError> {
        for entry in self.primitives.entries_in_keyset_order() {
            match entry.primitive().verify_and_decode(compact, validator) {
                Ok(verified) => return Ok(verified),
                // The token is authentic but unacceptable, or not a
                // token at all: no other key changes that.
                Err(err @ (JwtError::Validation(_) | JwtError::Malformed(_))) => return Err(err),
                Err(_) => {}
            }
        }
        Err(JwtError::InvalidToken)
    }
}
