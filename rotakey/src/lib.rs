//! # RotaKey
//!
//! Multi-key cryptographic primitives with zero-downtime key rotation.
//!
//! A keyset holds several versions of a key at once; exactly one
//! enabled version (the primary) produces new output, while every
//! enabled version can still accept old output. Rotation is then a
//! metadata change — add a key, promote it, retire the old one — and
//! nothing previously encrypted, signed, or issued becomes unreadable.
//!
//! The pieces:
//!
//! - [`types`]: key metadata, output prefixes, keysets.
//! - [`core`]: the frozen [`PrimitiveSet`](core::PrimitiveSet)
//!   container, its single-use builder, the constructor
//!   [`registry`](core::registry), and the capability-erased
//!   [`KeysetView`](core::KeysetView).
//! - [`aead`], [`mac`], [`signature`], [`jwt`], [`hybrid`]: the
//!   primitive families, each with a keyset wrapper that hides how
//!   many keys exist.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rotakey::aead::{register_aes_gcm, Aead, AesGcmKey, KeysetAead};
//! use rotakey::core::{materialize, PrimitiveRegistry};
//! use rotakey::types::{
//!     Annotations, KeyMetadata, KeyStatus, Keyset, KeysetKey, OutputPrefixVariant,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = PrimitiveRegistry::new();
//! register_aes_gcm(&mut registry);
//!
//! let keyset = Keyset::new(
//!     vec![KeysetKey::new(
//!         Arc::new(AesGcmKey::generate()),
//!         KeyMetadata::new(1, KeyStatus::Enabled, OutputPrefixVariant::Tink),
//!     )],
//!     Some(1),
//! );
//!
//! let set = materialize(&keyset, &registry, Annotations::empty())?;
//! let aead = KeysetAead::new(Arc::new(set))?;
//!
//! let ciphertext = aead.encrypt(b"plaintext", b"context")?;
//! assert_eq!(aead.decrypt(&ciphertext, b"context")?, b"plaintext");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

pub use rota_aead as aead;
pub use rota_core as core;
pub use rota_hybrid as hybrid;
pub use rota_jwt as jwt;
pub use rota_mac as mac;
pub use rota_signature as signature;
pub use rota_types as types;

/// The commonly used surface in one import.
pub mod prelude {
    pub use rota_aead::{Aead, AeadError, AesGcmKey, KeysetAead};
    pub use rota_core::{
        materialize, CoreError, Entry, KeysetEntry, KeysetView, PrimitiveRegistry, PrimitiveSet,
        PrimitiveSetBuilder,
    };
    pub use rota_hybrid::{
        HybridDecrypt, HybridEncrypt, HybridError, KeysetHybridDecrypt, KeysetHybridEncrypt,
    };
    pub use rota_jwt::{JwtError, JwtPublicKeyVerify, JwtValidator, KeysetJwtVerifier};
    pub use rota_mac::{KeysetMac, Mac, MacError};
    pub use rota_signature::{KeysetVerifier, PublicKeyVerify, SignatureError};
    pub use rota_types::{
        Annotations, KeyDescriptor, KeyMetadata, KeyStatus, Keyset, KeysetKey, OutputPrefix,
        OutputPrefixVariant, NON_RAW_PREFIX_LEN,
    };
}
