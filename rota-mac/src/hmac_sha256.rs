#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! HMAC-SHA256
//!
//! Tag verification goes through the backend's constant-time check,
//! never a byte-wise comparison.

use aws_lc_rs::hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use rota_core::PrimitiveRegistry;
use rota_types::{KeyDescriptor, SecretBytes};

use crate::{Mac, MacError};

/// HMAC-SHA256 key length in bytes.
pub const HMAC_SHA256_KEY_LEN: usize = 32;

/// Key descriptor for an HMAC-SHA256 key.
#[derive(Debug, Clone)]
pub struct HmacSha256Key {
    material: SecretBytes,
}

impl HmacSha256Key {
    /// Wrap 32 bytes of key material.
    ///
    /// # Errors
    /// Returns an error for any other length.
    pub fn new(material: Vec<u8>) -> Result<Self, MacError> {
        if material.len() != HMAC_SHA256_KEY_LEN {
            return Err(MacError::InvalidKeyLength {
                expected: HMAC_SHA256_KEY_LEN,
                actual: material.len(),
            });
        }
        Ok(Self { material: SecretBytes::new(material) })
    }

    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut material = vec![0u8; HMAC_SHA256_KEY_LEN];
        OsRng.fill_bytes(&mut material);
        Self { material: SecretBytes::new(material) }
    }

    /// The raw key material.
    #[must_use]
    pub fn material(&self) -> &[u8] {
        self.material.expose()
    }
}

impl KeyDescriptor for HmacSha256Key {
    fn type_name(&self) -> &'static str {
        "HmacSha256Key"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// HMAC-SHA256 implementation of [`Mac`].
pub struct HmacSha256 {
    key: hmac::Key,
}

impl HmacSha256 {
    /// Build the MAC from a key descriptor.
    #[must_use]
    pub fn new(key: &HmacSha256Key) -> Self {
        Self { key: hmac::Key::new(hmac::HMAC_SHA256, key.material()) }
    }
}

impl std::fmt::Debug for HmacSha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256").finish_non_exhaustive()
    }
}

impl Mac for HmacSha256 {
    fn compute(&self, data: &[u8]) -> Result<Vec<u8>, MacError> {
        Ok(hmac::sign(&self.key, data).as_ref().to_vec())
    }

    fn verify(&self, tag: &[u8], data: &[u8]) -> Result<(), MacError> {
        hmac::verify(&self.key, data, tag).map_err(|_e| MacError::InvalidTag)
    }
}

/// Register the HMAC-SHA256 constructor with a MAC registry.
pub fn register_hmac_sha256(registry: &mut PrimitiveRegistry<Box<dyn Mac>>) {
    registry.register::<HmacSha256Key, _>(|key| Ok(Box::new(HmacSha256::new(key)) as Box<dyn Mac>));
}
