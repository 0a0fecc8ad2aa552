#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Ed25519 (RFC 8032) verification.

use aws_lc_rs::signature::{UnparsedPublicKey, ED25519};
use rota_core::PrimitiveRegistry;
use rota_types::KeyDescriptor;

use crate::{PublicKeyVerify, SignatureError};

/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// Key descriptor for an Ed25519 public key. Public material, no
/// zeroization needed.
#[derive(Debug, Clone)]
pub struct Ed25519PublicKey {
    material: Vec<u8>,
}

impl Ed25519PublicKey {
    /// Wrap 32 bytes of public key material.
    ///
    /// # Errors
    /// Returns an error for any other length.
    pub fn new(material: Vec<u8>) -> Result<Self, SignatureError> {
        if material.len() != ED25519_PUBLIC_KEY_LEN {
            return Err(SignatureError::InvalidKey(format!(
                "Ed25519 public key must be {ED25519_PUBLIC_KEY_LEN} bytes, got {}",
                material.len()
            )));
        }
        Ok(Self { material })
    }

    /// The raw public key bytes.
    #[must_use]
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

impl KeyDescriptor for Ed25519PublicKey {
    fn type_name(&self) -> &'static str {
        "Ed25519PublicKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Ed25519 implementation of [`PublicKeyVerify`].
pub struct Ed25519Verify {
    key: UnparsedPublicKey<Vec<u8>>,
}

impl std::fmt::Debug for Ed25519Verify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Verify").finish_non_exhaustive()
    }
}

impl Ed25519Verify {
    /// Build the verifier from a key descriptor.
    #[must_use]
    pub fn new(key: &Ed25519PublicKey) -> Self {
        Self { key: UnparsedPublicKey::new(&ED25519, key.material().to_vec()) }
    }
}

impl PublicKeyVerify for Ed25519Verify {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), SignatureError> {
        self.key.verify(data, signature).map_err(|_e| SignatureError::InvalidSignature)
    }
}

/// Register the Ed25519 constructor with a verifier registry.
pub fn register_ed25519(registry: &mut PrimitiveRegistry<Box<dyn PublicKeyVerify>>) {
    registry.register::<Ed25519PublicKey, _>(|key| {
        Ok(Box::new(Ed25519Verify::new(key)) as Box<dyn PublicKeyVerify>)
    });
}
