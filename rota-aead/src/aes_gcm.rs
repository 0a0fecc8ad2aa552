#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! AES-256-GCM
//!
//! The workhorse AEAD (NIST SP 800-38D). Wire layout of a raw
//! ciphertext: `nonce (12) || ciphertext || tag (16)`, with a fresh
//! random nonce per encryption.

use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use rand::rngs::OsRng;
use rand::RngCore;
use rota_core::{CoreError, PrimitiveRegistry};
use rota_types::{KeyDescriptor, SecretBytes};

use crate::{Aead, AeadError};

/// AES-256-GCM key length in bytes.
pub const AES_256_GCM_KEY_LEN: usize = 32;

/// AES-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Key descriptor for an AES-256-GCM key: 32 bytes of symmetric
/// material, zeroized on drop.
#[derive(Debug, Clone)]
pub struct AesGcmKey {
    material: SecretBytes,
}

impl AesGcmKey {
    /// Wrap 32 bytes of key material.
    ///
    /// # Errors
    /// Returns an error for any other length.
    pub fn new(material: Vec<u8>) -> Result<Self, AeadError> {
        if material.len() != AES_256_GCM_KEY_LEN {
            return Err(AeadError::InvalidKeyLength {
                expected: AES_256_GCM_KEY_LEN,
                actual: material.len(),
            });
        }
        Ok(Self { material: SecretBytes::new(material) })
    }

    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut material = vec![0u8; AES_256_GCM_KEY_LEN];
        OsRng.fill_bytes(&mut material);
        Self { material: SecretBytes::new(material) }
    }

    /// The raw key material.
    #[must_use]
    pub fn material(&self) -> &[u8] {
        self.material.expose()
    }
}

impl KeyDescriptor for AesGcmKey {
    fn type_name(&self) -> &'static str {
        "AesGcmKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// AES-256-GCM implementation of [`Aead`].
pub struct AesGcmAead {
    key: LessSafeKey,
}

impl AesGcmAead {
    /// Build the cipher from a key descriptor.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the key material.
    pub fn new(key: &AesGcmKey) -> Result<Self, AeadError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key.material()).map_err(|_e| {
            AeadError::InvalidKeyLength {
                expected: AES_256_GCM_KEY_LEN,
                actual: key.material().len(),
            }
        })?;
        Ok(Self { key: LessSafeKey::new(unbound) })
    }
}

impl std::fmt::Debug for AesGcmAead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmAead").finish_non_exhaustive()
    }
}

impl Aead for AesGcmAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::from(associated_data), &mut in_out)
            .map_err(|_e| AeadError::EncryptionFailed("AES-GCM seal failed".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        if ciphertext.len() < NONCE_LEN + TAG_LEN {
            return Err(AeadError::DecryptionFailed);
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
        let mut nonce_array = [0u8; NONCE_LEN];
        nonce_array.copy_from_slice(nonce_bytes);
        let nonce = Nonce::assume_unique_for_key(nonce_array);

        let mut in_out = body.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(associated_data), &mut in_out)
            .map_err(|_e| AeadError::DecryptionFailed)?;
        Ok(plaintext.to_vec())
    }
}

/// Register the AES-256-GCM constructor with an AEAD registry.
pub fn register_aes_gcm(registry: &mut PrimitiveRegistry<Box<dyn Aead>>) {
    registry.register::<AesGcmKey, _>(|key| {
        let aead = AesGcmAead::new(key)
            .map_err(|e| CoreError::ConstructorFailed(e.to_string()))?;
        Ok(Box::new(aead) as Box<dyn Aead>)
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_with_associated_data() {
        let key = AesGcmKey::generate();
        let aead = AesGcmAead::new(&key).unwrap();

        let ciphertext = aead.encrypt(b"attack at dawn", b"header").unwrap();
        let plaintext = aead.decrypt(&ciphertext, b"header").unwrap();
        assert_eq!(plaintext, b"attack at dawn");
    }

    #[test]
    fn wrong_associated_data_is_rejected() {
        let key = AesGcmKey::generate();
        let aead = AesGcmAead::new(&key).unwrap();

        let ciphertext = aead.encrypt(b"msg", b"aad-1").unwrap();
        assert_eq!(aead.decrypt(&ciphertext, b"aad-2").unwrap_err(), AeadError::DecryptionFailed);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let key = AesGcmKey::generate();
        let aead = AesGcmAead::new(&key).unwrap();

        let mut ciphertext = aead.encrypt(b"msg", b"").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;
        assert_eq!(aead.decrypt(&ciphertext, b"").unwrap_err(), AeadError::DecryptionFailed);
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let key = AesGcmKey::generate();
        let aead = AesGcmAead::new(&key).unwrap();
        assert_eq!(aead.decrypt(&[0u8; 10], b"").unwrap_err(), AeadError::DecryptionFailed);
    }

    #[test]
    fn ciphertexts_are_nonce_randomized() {
        let key = AesGcmKey::generate();
        let aead = AesGcmAead::new(&key).unwrap();
        let a = aead.encrypt(b"msg", b"").unwrap();
        let b = aead.encrypt(b"msg", b"").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let err = AesGcmKey::new(vec![0u8; 16]).unwrap_err();
        assert_eq!(err, AeadError::InvalidKeyLength { expected: 32, actual: 16 });
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = AesGcmKey::generate();
        let debug = format!("{key:?}");
        assert!(debug.contains("SecretBytes"));
        assert!(!debug.contains("material: ["));
    }
}
