#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! X25519 + AES-256-GCM hybrid primitives.
//!
//! The DHKEM shared secret is used directly as the AES-256-GCM key
//! (both 32 bytes), and the caller's context info rides as the DEM's
//! associated data. Wire layout of a raw hybrid ciphertext:
//! `encapsulated key (32) || nonce (12) || ciphertext || tag (16)`.

use rota_aead::aes_gcm::{AesGcmAead, AesGcmKey};
use rota_aead::Aead;
use rota_core::{CoreError, PrimitiveRegistry};
use rota_types::{KeyDescriptor, SecretBytes};

use crate::x25519_kem::{X25519HkdfSha256Kem, X25519KemKeyPair, X25519_KEY_LEN};
use crate::{HybridDecrypt, HybridEncrypt, HybridError, KemError};

/// Key descriptor for the encrypting side: the recipient's public key.
#[derive(Debug, Clone)]
pub struct X25519HybridPublicKey {
    public_bytes: [u8; X25519_KEY_LEN],
}

impl X25519HybridPublicKey {
    /// Wrap 32 bytes of X25519 public key material.
    ///
    /// # Errors
    /// Returns an error for any other length.
    pub fn new(public: &[u8]) -> Result<Self, HybridError> {
        if public.len() != X25519_KEY_LEN {
            return Err(HybridError::Kem(KemError::InvalidKeySize {
                expected: X25519_KEY_LEN,
                actual: public.len(),
            }));
        }
        let mut public_bytes = [0u8; X25519_KEY_LEN];
        public_bytes.copy_from_slice(public);
        Ok(Self { public_bytes })
    }

    /// The raw public key bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> &[u8; X25519_KEY_LEN] {
        &self.public_bytes
    }
}

impl KeyDescriptor for X25519HybridPublicKey {
    fn type_name(&self) -> &'static str {
        "X25519HybridPublicKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Key descriptor for the decrypting side: the recipient's private
/// seed, zeroized on drop.
#[derive(Debug, Clone)]
pub struct X25519HybridPrivateKey {
    seed: SecretBytes,
    public_bytes: [u8; X25519_KEY_LEN],
}

impl X25519HybridPrivateKey {
    /// Generate a fresh recipient key.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate() -> Result<Self, HybridError> {
        let keypair = X25519KemKeyPair::generate()?;
        let seed = keypair.seed()?;
        Ok(Self {
            seed: SecretBytes::new(seed.to_vec()),
            public_bytes: *keypair.public_key_bytes(),
        })
    }

    /// Reconstruct a recipient key from a stored 32-byte seed.
    ///
    /// # Errors
    /// Returns an error if the seed is rejected.
    pub fn from_seed(seed: &[u8]) -> Result<Self, HybridError> {
        if seed.len() != X25519_KEY_LEN {
            return Err(HybridError::Kem(KemError::InvalidKeySize {
                expected: X25519_KEY_LEN,
                actual: seed.len(),
            }));
        }
        let mut seed_bytes = [0u8; X25519_KEY_LEN];
        seed_bytes.copy_from_slice(seed);
        let keypair = X25519KemKeyPair::from_seed(&seed_bytes)?;
        Ok(Self {
            seed: SecretBytes::new(seed.to_vec()),
            public_bytes: *keypair.public_key_bytes(),
        })
    }

    /// The matching public key descriptor.
    #[must_use]
    pub fn public_key(&self) -> X25519HybridPublicKey {
        X25519HybridPublicKey { public_bytes: self.public_bytes }
    }

    fn keypair(&self) -> Result<X25519KemKeyPair, HybridError> {
        let mut seed_bytes = [0u8; X25519_KEY_LEN];
        seed_bytes.copy_from_slice(self.seed.expose());
        Ok(X25519KemKeyPair::from_seed(&seed_bytes)?)
    }
}

impl KeyDescriptor for X25519HybridPrivateKey {
    fn type_name(&self) -> &'static str {
        "X25519HybridPrivateKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Encrypting half of the X25519 + AES-256-GCM hybrid.
#[derive(Debug)]
pub struct X25519HybridEncrypt {
    kem: X25519HkdfSha256Kem,
    recipient_public: [u8; X25519_KEY_LEN],
}

impl X25519HybridEncrypt {
    /// Build the encrypter for one recipient public key.
    #[must_use]
    pub fn new(key: &X25519HybridPublicKey) -> Self {
        Self { kem: X25519HkdfSha256Kem, recipient_public: *key.public_key_bytes() }
    }
}

impl HybridEncrypt for X25519HybridEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError> {
        let (shared_secret, enc) = self.kem.encapsulate(&self.recipient_public)?;

        let dem_key = AesGcmKey::new(shared_secret.to_vec())
            .map_err(|e| HybridError::EncryptionFailed(e.to_string()))?;
        let dem = AesGcmAead::new(&dem_key)
            .map_err(|e| HybridError::EncryptionFailed(e.to_string()))?;
        let payload = dem
            .encrypt(plaintext, context_info)
            .map_err(|e| HybridError::EncryptionFailed(e.to_string()))?;

        let mut out = Vec::with_capacity(enc.len() + payload.len());
        out.extend_from_slice(&enc);
        out.extend_from_slice(&payload);
        Ok(out)
    }
}

/// Decrypting half of the X25519 + AES-256-GCM hybrid.
pub struct X25519HybridDecrypt {
    kem: X25519HkdfSha256Kem,
    recipient: X25519KemKeyPair,
}

impl X25519HybridDecrypt {
    /// Build the decrypter from a private key descriptor.
    ///
    /// # Errors
    /// Returns an error if the stored seed is rejected.
    pub fn new(key: &X25519HybridPrivateKey) -> Result<Self, HybridError> {
        Ok(Self { kem: X25519HkdfSha256Kem, recipient: key.keypair()? })
    }
}

impl std::fmt::Debug for X25519HybridDecrypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X25519HybridDecrypt").finish_non_exhaustive()
    }
}

impl HybridDecrypt for X25519HybridDecrypt {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError> {
        if ciphertext.len() < X25519_KEY_LEN {
            return Err(HybridError::DecryptionFailed);
        }
        let (enc, payload) = ciphertext.split_at(X25519_KEY_LEN);

        let shared_secret = self
            .kem
            .decapsulate(enc, &self.recipient)
            .map_err(|_e| HybridError::DecryptionFailed)?;

        let dem_key = AesGcmKey::new(shared_secret.to_vec())
            .map_err(|_e| HybridError::DecryptionFailed)?;
        let dem = AesGcmAead::new(&dem_key).map_err(|_e| HybridError::DecryptionFailed)?;
        dem.decrypt(payload, context_info).map_err(|_e| HybridError::DecryptionFailed)
    }
}

/// Register the hybrid-encrypt constructor with a registry.
pub fn register_x25519_hybrid_encrypt(registry: &mut PrimitiveRegistry<Box<dyn HybridEncrypt>>) {
    registry.register::<X25519HybridPublicKey, _>(|key| {
        Ok(Box::new(X25519HybridEncrypt::new(key)) as Box<dyn HybridEncrypt>)
    });
}

/// Register the hybrid-decrypt constructor with a registry.
pub fn register_x25519_hybrid_decrypt(registry: &mut PrimitiveRegistry<Box<dyn HybridDecrypt>>) {
    registry.register::<X25519HybridPrivateKey, _>(|key| {
        let decrypt = X25519HybridDecrypt::new(key)
            .map_err(|e| CoreError::ConstructorFailed(e.to_string()))?;
        Ok(Box::new(decrypt) as Box<dyn HybridDecrypt>)
    });
}
