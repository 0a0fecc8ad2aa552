#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Keyset Verifier Wrapper
//!
//! A signature's leading bytes select a prefix bucket; every candidate
//! in the bucket sees the remaining bytes, in insertion order, and raw
//! keys see the whole signature as the fallback. A verify-only keyset
//! needs no primary: it accepts, it never produces.

use std::sync::Arc;

use rota_core::PrimitiveSet;
use rota_types::NON_RAW_PREFIX_LEN;

use crate::{PublicKeyVerify, SignatureError};

/// Signature verifier over every enabled key of a keyset.
///
/// Cheap to clone; all clones share the same frozen container.
#[derive(Clone)]
pub struct KeysetVerifier {
    primitives: Arc<PrimitiveSet<Box<dyn PublicKeyVerify>>>,
}

impl KeysetVerifier {
    /// Wrap a frozen container. A primary entry is permitted but not
    /// required.
    #[must_use]
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn PublicKeyVerify>>>) -> Self {
        Self { primitives }
    }
}

impl std::fmt::Debug for KeysetVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetVerifier")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

impl PublicKeyVerify for KeysetVerifier {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), SignatureError> {
        // Explicitly prefixed candidates first.
        if signature.len() >= NON_RAW_PREFIX_LEN {
            let (prefix, body) = signature.split_at(NON_RAW_PREFIX_LEN);
            for entry in self.primitives.entries_for_prefix(prefix) {
                if entry.primitive().verify(body, data).is_ok() {
                    return Ok(());
                }
            }
        }

        // Raw keys see the whole signature.
        for entry in self.primitives.raw_entries() {
            if entry.primitive().verify(signature, data).is_ok() {
                return Ok(());
            }
        }

        Err(SignatureError::InvalidSignature)
    }
}
