#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! RSA-SSA-PSS (RFC 8017) verification.
//!
//! Keys carry their public material as a PKCS#1 `RSAPublicKey` DER
//! blob plus the PSS parameter set. The salt length always equals the
//! digest length.

use aws_lc_rs::signature::{
    RsaEncoding, UnparsedPublicKey, VerificationAlgorithm, RSA_PSS_2048_8192_SHA256,
    RSA_PSS_2048_8192_SHA384, RSA_PSS_2048_8192_SHA512, RSA_PSS_SHA256, RSA_PSS_SHA384,
    RSA_PSS_SHA512,
};
use rota_core::PrimitiveRegistry;
use rota_types::KeyDescriptor;

use crate::{PublicKeyVerify, SignatureError};

/// PSS parameter set: digest and MGF-1 hash, salt length equal to the
/// digest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PssAlgorithm {
    /// SHA-256 digest, 32-byte salt.
    Sha256,
    /// SHA-384 digest, 48-byte salt.
    Sha384,
    /// SHA-512 digest, 64-byte salt.
    Sha512,
}

impl PssAlgorithm {
    pub(crate) fn verification(self) -> &'static dyn VerificationAlgorithm {
        match self {
            Self::Sha256 => &RSA_PSS_2048_8192_SHA256,
            Self::Sha384 => &RSA_PSS_2048_8192_SHA384,
            Self::Sha512 => &RSA_PSS_2048_8192_SHA512,
        }
    }

    /// The matching signing padding, for keypair-holding callers.
    #[must_use]
    pub fn signing(self) -> &'static dyn RsaEncoding {
        match self {
            Self::Sha256 => &RSA_PSS_SHA256,
            Self::Sha384 => &RSA_PSS_SHA384,
            Self::Sha512 => &RSA_PSS_SHA512,
        }
    }
}

/// Key descriptor for an RSA-SSA-PSS public key.
#[derive(Debug, Clone)]
pub struct RsaSsaPssPublicKey {
    der: Vec<u8>,
    algorithm: PssAlgorithm,
}

impl RsaSsaPssPublicKey {
    /// Wrap a PKCS#1 `RSAPublicKey` DER blob.
    ///
    /// # Errors
    /// Returns an error if the blob is empty. Structural validation
    /// happens on first verification.
    pub fn new(der: Vec<u8>, algorithm: PssAlgorithm) -> Result<Self, SignatureError> {
        if der.is_empty() {
            return Err(SignatureError::InvalidKey("empty RSA public key".to_string()));
        }
        Ok(Self { der, algorithm })
    }

    /// The DER-encoded public key.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The PSS parameter set.
    #[must_use]
    pub fn algorithm(&self) -> PssAlgorithm {
        self.algorithm
    }
}

impl KeyDescriptor for RsaSsaPssPublicKey {
    fn type_name(&self) -> &'static str {
        "RsaSsaPssPublicKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// RSA-SSA-PSS implementation of [`PublicKeyVerify`].
pub struct RsaSsaPssVerify {
    key: UnparsedPublicKey<Vec<u8>>,
}

impl std::fmt::Debug for RsaSsaPssVerify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSsaPssVerify").finish_non_exhaustive()
    }
}

impl RsaSsaPssVerify {
    /// Build the verifier from a key descriptor.
    #[must_use]
    pub fn new(key: &RsaSsaPssPublicKey) -> Self {
        Self { key: UnparsedPublicKey::new(key.algorithm().verification(), key.der().to_vec()) }
    }
}

impl PublicKeyVerify for RsaSsaPssVerify {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), SignatureError> {
        self.key.verify(data, signature).map_err(|_e| SignatureError::InvalidSignature)
    }
}

/// Register the RSA-SSA-PSS constructor with a verifier registry.
pub fn register_rsa_ssa_pss(registry: &mut PrimitiveRegistry<Box<dyn PublicKeyVerify>>) {
    registry.register::<RsaSsaPssPublicKey, _>(|key| {
        Ok(Box::new(RsaSsaPssVerify::new(key)) as Box<dyn PublicKeyVerify>)
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::rsa::KeySize;
    use aws_lc_rs::signature::{KeyPair, RsaKeyPair};

    use super::*;

    fn sign(keypair: &RsaKeyPair, algorithm: PssAlgorithm, data: &[u8]) -> Vec<u8> {
        let rng = SystemRandom::new();
        let mut signature = vec![0u8; keypair.public_modulus_len()];
        keypair.sign(algorithm.signing(), &rng, data, &mut signature).unwrap();
        signature
    }

    #[test]
    fn valid_ps256_signature_verifies() {
        let keypair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
        let public = RsaSsaPssPublicKey::new(
            keypair.public_key().as_ref().to_vec(),
            PssAlgorithm::Sha256,
        )
        .unwrap();
        let verifier = RsaSsaPssVerify::new(&public);

        let signature = sign(&keypair, PssAlgorithm::Sha256, b"signed message");
        verifier.verify(&signature, b"signed message").unwrap();
    }

    #[test]
    fn digest_mismatch_is_rejected() {
        let keypair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
        let public = RsaSsaPssPublicKey::new(
            keypair.public_key().as_ref().to_vec(),
            PssAlgorithm::Sha384,
        )
        .unwrap();
        let verifier = RsaSsaPssVerify::new(&public);

        // Signed with SHA-256 PSS, verified as SHA-384 PSS.
        let signature = sign(&keypair, PssAlgorithm::Sha256, b"msg");
        assert_eq!(
            verifier.verify(&signature, b"msg").unwrap_err(),
            SignatureError::InvalidSignature
        );
    }

    #[test]
    fn modified_data_is_rejected() {
        let keypair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
        let public = RsaSsaPssPublicKey::new(
            keypair.public_key().as_ref().to_vec(),
            PssAlgorithm::Sha256,
        )
        .unwrap();
        let verifier = RsaSsaPssVerify::new(&public);

        let signature = sign(&keypair, PssAlgorithm::Sha256, b"msg");
        assert_eq!(
            verifier.verify(&signature, b"msG").unwrap_err(),
            SignatureError::InvalidSignature
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(RsaSsaPssPublicKey::new(Vec::new(), PssAlgorithm::Sha256).is_err());
    }
}
