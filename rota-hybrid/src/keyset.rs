#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Keyset Hybrid Wrappers
//!
//! Encryption and decryption are split across two keysets: the sender
//! holds public keys and must have a primary, the recipient holds
//! private keys and needs none. Candidate resolution on the decrypt
//! side is the usual prefix-bucket walk with the raw bucket as
//! fallback.

use std::sync::Arc;

use rota_core::PrimitiveSet;
use rota_types::NON_RAW_PREFIX_LEN;

use crate::{HybridDecrypt, HybridEncrypt, HybridError};

/// Hybrid encrypter over the enabled public keys of a keyset.
///
/// Cheap to clone; all clones share the same frozen container.
#[derive(Clone)]
pub struct KeysetHybridEncrypt {
    primitives: Arc<PrimitiveSet<Box<dyn HybridEncrypt>>>,
}

impl KeysetHybridEncrypt {
    /// Wrap a frozen container.
    ///
    /// # Errors
    /// Returns [`HybridError::MissingPrimary`] if the container has no
    /// primary entry.
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn HybridEncrypt>>>) -> Result<Self, HybridError> {
        if primitives.primary().is_none() {
            return Err(HybridError::MissingPrimary);
        }
        Ok(Self { primitives })
    }
}

impl std::fmt::Debug for KeysetHybridEncrypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetHybridEncrypt")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

impl HybridEncrypt for KeysetHybridEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError> {
        let primary = self.primitives.primary().ok_or(HybridError::MissingPrimary)?;
        let raw = primary.primitive().encrypt(plaintext, context_info)?;

        let prefix = primary.output_prefix().as_bytes();
        let mut out = Vec::with_capacity(prefix.len() + raw.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(&raw);
        Ok(out)
    }
}

/// Hybrid decrypter over the enabled private keys of a keyset.
///
/// Cheap to clone; all clones share the same frozen container.
#[derive(Clone)]
pub struct KeysetHybridDecrypt {
    primitives: Arc<PrimitiveSet<Box<dyn HybridDecrypt>>>,
}

impl KeysetHybridDecrypt {
    /// Wrap a frozen container. A primary entry is permitted but not
    /// required.
    #[must_use]
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn HybridDecrypt>>>) -> Self {
        Self { primitives }
    }
}

impl std::fmt::Debug for KeysetHybridDecrypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetHybridDecrypt")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

impl HybridDecrypt for KeysetHybridDecrypt {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> Result<Vec<u8>, HybridError> {
        // Explicitly prefixed candidates first.
        if ciphertext.len() >= NON_RAW_PREFIX_LEN {
            let (prefix, body) = ciphertext.split_at(NON_RAW_PREFIX_LEN);
            for entry in self.primitives.entries_for_prefix(prefix) {
                if let Ok(plaintext) = entry.primitive().decrypt(body, context_info) {
                    return Ok(plaintext);
                }
            }
        }

        // Raw keys see the whole ciphertext.
        for entry in self.primitives.raw_entries() {
            if let Ok(plaintext) = entry.primitive().decrypt(ciphertext, context_info) {
                return Ok(plaintext);
            }
        }

        Err(HybridError::DecryptionFailed)
    }
}
