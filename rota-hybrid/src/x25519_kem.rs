#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! DHKEM(X25519, HKDF-SHA256), RFC 9180 §4.1.
//!
//! Every derivation goes through the labeled extract-and-expand of the
//! HPKE suite: inputs are framed with `"HPKE-v1"`, the KEM suite id
//! (`"KEM" || 0x0020`) and a per-step label, so secrets derived here
//! can never collide with another suite's even from identical
//! Diffie-Hellman output.

use aws_lc_rs::agreement::{self, PrivateKey, UnparsedPublicKey, X25519};
use aws_lc_rs::encoding::{AsBigEndian, Curve25519SeedBin};
use aws_lc_rs::hkdf::{KeyType, Salt, HKDF_SHA256};
use thiserror::Error;
use zeroize::Zeroizing;

/// X25519 public key, private seed, and encapsulated key length.
pub const X25519_KEY_LEN: usize = 32;

/// DHKEM shared secret length (`Nsecret`).
const SHARED_SECRET_LEN: usize = 32;

/// `"KEM" || I2OSP(0x0020, 2)`, the DHKEM(X25519, HKDF-SHA256) suite id.
const KEM_SUITE_ID: &[u8; 5] = b"KEM\x00\x20";

const HPKE_VERSION_LABEL: &[u8; 7] = b"HPKE-v1";

/// Errors from key encapsulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KemError {
    /// Key generation failed.
    #[error("KEM key generation failed")]
    KeyGenerationFailed,

    /// A key or encapsulated key has the wrong length.
    #[error("invalid KEM key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// Diffie-Hellman agreement failed.
    #[error("KEM agreement failed")]
    AgreementFailed,

    /// HKDF derivation failed.
    #[error("KEM derivation failed")]
    DerivationFailed,
}

/// Output length marker for HKDF expansion.
struct HkdfOutputLen(usize);

impl KeyType for HkdfOutputLen {
    fn len(&self) -> usize {
        self.0
    }
}

/// A reusable X25519 key pair for encapsulation and decapsulation.
///
/// The private key supports repeated agreements, so one recipient key
/// decapsulates any number of messages.
pub struct X25519KemKeyPair {
    private: PrivateKey,
    public_bytes: [u8; X25519_KEY_LEN],
}

impl X25519KemKeyPair {
    /// Generate a fresh key pair.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate() -> Result<Self, KemError> {
        let private = PrivateKey::generate(&X25519).map_err(|_e| KemError::KeyGenerationFailed)?;
        Self::from_private(private)
    }

    /// Reconstruct a key pair from a 32-byte private seed.
    ///
    /// # Errors
    /// Returns an error if the seed is rejected.
    pub fn from_seed(seed: &[u8; X25519_KEY_LEN]) -> Result<Self, KemError> {
        let private = PrivateKey::from_private_key(&X25519, seed)
            .map_err(|_e| KemError::KeyGenerationFailed)?;
        Self::from_private(private)
    }

    fn from_private(private: PrivateKey) -> Result<Self, KemError> {
        let public =
            private.compute_public_key().map_err(|_e| KemError::KeyGenerationFailed)?;
        let mut public_bytes = [0u8; X25519_KEY_LEN];
        public_bytes.copy_from_slice(public.as_ref());
        Ok(Self { private, public_bytes })
    }

    /// Export the private seed for storage.
    ///
    /// # Errors
    /// Returns an error if seed extraction fails.
    pub fn seed(&self) -> Result<Zeroizing<[u8; X25519_KEY_LEN]>, KemError> {
        let seed: Curve25519SeedBin<'_> =
            self.private.as_be_bytes().map_err(|_e| KemError::KeyGenerationFailed)?;
        let mut bytes = [0u8; X25519_KEY_LEN];
        bytes.copy_from_slice(seed.as_ref());
        Ok(Zeroizing::new(bytes))
    }

    /// The public key bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> &[u8; X25519_KEY_LEN] {
        &self.public_bytes
    }

    /// Agree with a peer public key, without consuming the private key.
    fn agree(&self, peer_public: &[u8]) -> Result<Zeroizing<[u8; X25519_KEY_LEN]>, KemError> {
        let peer = UnparsedPublicKey::new(&X25519, peer_public);
        agreement::agree(&self.private, peer, KemError::AgreementFailed, |shared| {
            let mut out = Zeroizing::new([0u8; X25519_KEY_LEN]);
            out.copy_from_slice(shared);
            Ok(out)
        })
    }
}

impl std::fmt::Debug for X25519KemKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X25519KemKeyPair")
            .field("public_bytes", &self.public_bytes)
            .finish_non_exhaustive()
    }
}

/// The DHKEM(X25519, HKDF-SHA256) operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct X25519HkdfSha256Kem;

impl X25519HkdfSha256Kem {
    /// Encapsulate a fresh shared secret to `recipient_public`.
    ///
    /// Returns the 32-byte shared secret and the 32-byte encapsulated
    /// key to put on the wire.
    ///
    /// # Errors
    /// Returns an error if the recipient key is invalid or agreement
    /// fails.
    pub fn encapsulate(
        &self,
        recipient_public: &[u8],
    ) -> Result<(Zeroizing<[u8; SHARED_SECRET_LEN]>, [u8; X25519_KEY_LEN]), KemError> {
        let ephemeral = X25519KemKeyPair::generate()?;
        self.encapsulate_with_ephemeral(recipient_public, &ephemeral)
    }

    /// Encapsulate with a caller-supplied ephemeral key pair.
    ///
    /// Deterministic given the ephemeral key; exists for test vectors
    /// and derived-key protocols. Production callers want
    /// [`encapsulate`](Self::encapsulate).
    ///
    /// # Errors
    /// Returns an error if the recipient key is invalid or agreement
    /// fails.
    pub fn encapsulate_with_ephemeral(
        &self,
        recipient_public: &[u8],
        ephemeral: &X25519KemKeyPair,
    ) -> Result<(Zeroizing<[u8; SHARED_SECRET_LEN]>, [u8; X25519_KEY_LEN]), KemError> {
        check_key_len(recipient_public)?;
        let dh = ephemeral.agree(recipient_public)?;
        let enc = *ephemeral.public_key_bytes();

        let shared_secret = extract_and_expand(&[&dh[..]], &[&enc, recipient_public])?;
        Ok((shared_secret, enc))
    }

    /// Recover the shared secret from an encapsulated key.
    ///
    /// # Errors
    /// Returns an error if the encapsulated key is invalid or agreement
    /// fails.
    pub fn decapsulate(
        &self,
        encapsulated: &[u8],
        recipient: &X25519KemKeyPair,
    ) -> Result<Zeroizing<[u8; SHARED_SECRET_LEN]>, KemError> {
        check_key_len(encapsulated)?;
        let dh = recipient.agree(encapsulated)?;
        extract_and_expand(&[&dh[..]], &[encapsulated, recipient.public_key_bytes()])
    }

    /// Encapsulate with sender authentication: the derived secret also
    /// proves possession of `sender`'s private key.
    ///
    /// # Errors
    /// Returns an error if a key is invalid or agreement fails.
    pub fn auth_encapsulate(
        &self,
        recipient_public: &[u8],
        sender: &X25519KemKeyPair,
    ) -> Result<(Zeroizing<[u8; SHARED_SECRET_LEN]>, [u8; X25519_KEY_LEN]), KemError> {
        let ephemeral = X25519KemKeyPair::generate()?;
        self.auth_encapsulate_with_ephemeral(recipient_public, sender, &ephemeral)
    }

    /// Authenticated encapsulation with a caller-supplied ephemeral.
    ///
    /// # Errors
    /// Returns an error if a key is invalid or agreement fails.
    pub fn auth_encapsulate_with_ephemeral(
        &self,
        recipient_public: &[u8],
        sender: &X25519KemKeyPair,
        ephemeral: &X25519KemKeyPair,
    ) -> Result<(Zeroizing<[u8; SHARED_SECRET_LEN]>, [u8; X25519_KEY_LEN]), KemError> {
        check_key_len(recipient_public)?;
        let dh_ephemeral = ephemeral.agree(recipient_public)?;
        let dh_sender = sender.agree(recipient_public)?;
        let enc = *ephemeral.public_key_bytes();

        let shared_secret = extract_and_expand(
            &[&dh_ephemeral[..], &dh_sender[..]],
            &[&enc, recipient_public, sender.public_key_bytes()],
        )?;
        Ok((shared_secret, enc))
    }

    /// Recover the shared secret from an authenticated encapsulation.
    ///
    /// # Errors
    /// Returns an error if a key is invalid or agreement fails.
    pub fn auth_decapsulate(
        &self,
        encapsulated: &[u8],
        recipient: &X25519KemKeyPair,
        sender_public: &[u8],
    ) -> Result<Zeroizing<[u8; SHARED_SECRET_LEN]>, KemError> {
        check_key_len(encapsulated)?;
        check_key_len(sender_public)?;
        let dh_ephemeral = recipient.agree(encapsulated)?;
        let dh_sender = recipient.agree(sender_public)?;

        extract_and_expand(
            &[&dh_ephemeral[..], &dh_sender[..]],
            &[encapsulated, recipient.public_key_bytes(), sender_public],
        )
    }
}

fn check_key_len(key: &[u8]) -> Result<(), KemError> {
    if key.len() != X25519_KEY_LEN {
        return Err(KemError::InvalidKeySize { expected: X25519_KEY_LEN, actual: key.len() });
    }
    Ok(())
}

/// RFC 9180 `ExtractAndExpand`: `LabeledExtract("", "eae_prk", dh)`
/// then `LabeledExpand(prk, "shared_secret", kem_context, 32)`.
///
/// `dh_parts` and `kem_context_parts` are concatenated in order.
fn extract_and_expand(
    dh_parts: &[&[u8]],
    kem_context_parts: &[&[u8]],
) -> Result<Zeroizing<[u8; SHARED_SECRET_LEN]>, KemError> {
    // LabeledExtract frames the IKM, so the concatenation is explicit.
    let mut labeled_ikm =
        Vec::with_capacity(HPKE_VERSION_LABEL.len() + KEM_SUITE_ID.len() + 7 + 64);
    labeled_ikm.extend_from_slice(HPKE_VERSION_LABEL);
    labeled_ikm.extend_from_slice(KEM_SUITE_ID);
    labeled_ikm.extend_from_slice(b"eae_prk");
    for part in dh_parts {
        labeled_ikm.extend_from_slice(part);
    }
    let labeled_ikm = Zeroizing::new(labeled_ikm);

    let salt = Salt::new(HKDF_SHA256, &[]);
    let prk = salt.extract(&labeled_ikm);

    let length_prefix = (SHARED_SECRET_LEN as u16).to_be_bytes();
    let mut labeled_info: Vec<&[u8]> = vec![
        &length_prefix,
        HPKE_VERSION_LABEL,
        KEM_SUITE_ID,
        b"shared_secret",
    ];
    labeled_info.extend_from_slice(kem_context_parts);

    let okm = prk
        .expand(&labeled_info, HkdfOutputLen(SHARED_SECRET_LEN))
        .map_err(|_e| KemError::DerivationFailed)?;

    let mut shared_secret = Zeroizing::new([0u8; SHARED_SECRET_LEN]);
    okm.fill(&mut shared_secret[..]).map_err(|_e| KemError::DerivationFailed)?;
    Ok(shared_secret)
}
