//! # RotaKey Core
//!
//! The multi-key primitive container supporting zero-downtime key
//! rotation.
//!
//! A keyset may hold several key versions at once. For each enabled key,
//! a constructed primitive (an AEAD, a verifier, a JWT validator, ...)
//! is placed into a [`PrimitiveSet`]: an immutable container that groups
//! entries by the binary prefix their wire format emits, designates at
//! most one entry as the primary for new output, and preserves the
//! original keyset order for enumeration. Downstream primitive families
//! do all their cryptographic work through this container without
//! knowing how many keys exist or which one is current.
//!
//! ## Construction
//!
//! Containers are assembled exactly once through
//! [`PrimitiveSetBuilder`], a sequential single-use step that validates
//! every entry before indexing it, then freezes the result. A frozen
//! [`PrimitiveSet`] is deeply immutable and safe to share across
//! unlimited concurrent readers with no locking.
//!
//! ## Lookup
//!
//! The verify/decrypt path resolves candidates per prefix bucket instead
//! of trialing every key: a wire message's leading bytes select a
//! bucket, every candidate in that bucket is tried in insertion order,
//! and raw (unprefixed) keys serve as the fallback bucket. All-candidate
//! failure is reported by the family crates as one generic error so the
//! failure mode never identifies which keys were tried.
//!
//! ## Modules
//!
//! - [`primitive_set`]: [`Entry`], [`PrimitiveSet`],
//!   [`PrimitiveSetBuilder`]
//! - [`keyset_view`]: capability-erased [`KeysetView`] for rotation and
//!   audit tooling
//! - [`registry`]: [`PrimitiveRegistry`] mapping key types to
//!   constructors, and [`materialize`] wiring a keyset into a container
//! - [`error`]: [`CoreError`]

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Error types for container assembly and lookup.
pub mod error;
/// Capability-erased positional view over a frozen container.
pub mod keyset_view;
/// The entry value type, the frozen container, and its builder.
pub mod primitive_set;
/// Primitive constructor registry and keyset materialization.
pub mod registry;

pub use error::CoreError;
pub use keyset_view::{KeysetEntry, KeysetView};
pub use primitive_set::{Entry, PrimitiveSet, PrimitiveSetBuilder};
pub use registry::{materialize, PrimitiveRegistry};
