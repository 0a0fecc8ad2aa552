//! # RotaKey Types
//!
//! Pure-Rust domain types for the RotaKey key-rotation platform.
//!
//! This crate contains all types that have **zero crypto-backend
//! dependencies**, enabling:
//! - Lightweight dependency for crates that only need the key model
//! - Clean separation of the keyset data model from cryptographic
//!   implementations
//!
//! ## What's Here
//!
//! - **key**: `KeyStatus`, `OutputPrefixVariant`, `KeyMetadata`, the
//!   `KeyDescriptor` trait
//! - **prefix**: `OutputPrefix` and the pure wire-prefix rule
//! - **keyset**: the in-memory keyset value model consumed by
//!   `rota-core`
//! - **annotations**: free-form observability metadata attached to a
//!   primitive container at assembly time
//!
//! ## What's NOT Here (stays in `rota-core` and the family crates)
//!
//! - The primitive container itself and its assembly step
//! - Actual cryptographic operations (encrypt, decrypt, sign, verify)

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Observability metadata attached to a primitive container.
pub mod annotations;
/// Key status, prefix variants, metadata, and the descriptor trait.
pub mod key;
/// Keyset value model consumed by the assembly step.
pub mod keyset;
/// Opaque output prefixes and the pure wire-prefix rule.
pub mod prefix;
/// Zeroizing containers for key material.
pub mod secret;

pub use annotations::Annotations;
pub use key::{KeyDescriptor, KeyMetadata, KeyStatus, OutputPrefixVariant};
pub use keyset::{Keyset, KeysetKey};
pub use prefix::{output_prefix, OutputPrefix, NON_RAW_PREFIX_LEN};
pub use secret::SecretBytes;
