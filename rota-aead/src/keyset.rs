#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Keyset AEAD Wrapper
//!
//! The rotation-aware AEAD. Encryption always uses the primary key and
//! prepends its output prefix; decryption extracts the candidate
//! prefixes from the ciphertext and tries every entry in the matching
//! bucket, in insertion order, before falling back to the raw-key
//! bucket. No candidate failure short-circuits the search, and the
//! aggregate failure is a single generic error.

use std::sync::Arc;

use rota_core::PrimitiveSet;
use rota_types::NON_RAW_PREFIX_LEN;

use crate::{Aead, AeadError};

/// AEAD over every enabled key of a keyset.
///
/// Cheap to clone; all clones share the same frozen container.
#[derive(Clone)]
pub struct KeysetAead {
    primitives: Arc<PrimitiveSet<Box<dyn Aead>>>,
}

impl KeysetAead {
    /// Wrap a frozen container.
    ///
    /// # Errors
    /// Returns [`AeadError::MissingPrimary`] if the container has no
    /// primary entry: an encryption-capable family cannot produce
    /// output without one.
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn Aead>>>) -> Result<Self, AeadError> {
        if primitives.primary().is_none() {
            return Err(AeadError::MissingPrimary);
        }
        Ok(Self { primitives })
    }
}

impl std::fmt::Debug for KeysetAead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetAead")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

impl Aead for KeysetAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        let primary = self.primitives.primary().ok_or(AeadError::MissingPrimary)?;
        let raw = primary.primitive().encrypt(plaintext, associated_data)?;

        let prefix = primary.output_prefix().as_bytes();
        let mut out = Vec::with_capacity(prefix.len() + raw.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(&raw);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        // Explicitly prefixed candidates first.
        if ciphertext.len() >= NON_RAW_PREFIX_LEN {
            let (prefix, body) = ciphertext.split_at(NON_RAW_PREFIX_LEN);
            for entry in self.primitives.entries_for_prefix(prefix) {
                if let Ok(plaintext) = entry.primitive().decrypt(body, associated_data) {
                    return Ok(plaintext);
                }
            }
        }

        // Raw keys see the whole ciphertext.
        for entry in self.primitives.raw_entries() {
            if let Ok(plaintext) = entry.primitive().decrypt(ciphertext, associated_data) {
                return Ok(plaintext);
            }
        }

        Err(AeadError::DecryptionFailed)
    }
}
