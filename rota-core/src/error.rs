#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Error types for primitive-container operations.
//!
//! Every rejection is an explicit error value; nothing is logged and
//! swallowed, and the core never retries. Assembly-time rejections leave
//! the builder unchanged so a caller that checks the result can always
//! continue from a consistent state.

use rota_types::KeyStatus;
use thiserror::Error;

/// Errors from container assembly, lookup, and materialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The assembly step was used again after `build()` froze it.
    #[error("builder already consumed by build()")]
    BuilderConsumed,

    /// A key with a non-enabled status was offered to the assembly step.
    #[error("only enabled keys may enter a primitive set (key {key_id} is {status:?})")]
    KeyNotEnabled {
        /// Id of the rejected key.
        key_id: u32,
        /// The offending status.
        status: KeyStatus,
    },

    /// A second entry was designated primary in the same assembly step.
    #[error("a primary entry is already set")]
    DuplicatePrimary,

    /// An entry from a differently-typed container was passed to
    /// `primitive_for_entry`.
    #[error("entry does not belong to a primitive set of this capability type")]
    WrongCapability,

    /// Positional access past the end of the keyset view.
    #[error("entry index {index} out of range for keyset of size {size}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of entries in the container.
        size: usize,
    },

    /// No constructor is registered for the key's descriptor type.
    #[error("no primitive constructor registered for key type {0}")]
    UnknownKeyType(&'static str),

    /// A registered constructor failed to produce a usable primitive.
    #[error("primitive constructor failed: {0}")]
    ConstructorFailed(String),

    /// The keyset handed to materialization is internally inconsistent.
    #[error("invalid keyset: {0}")]
    InvalidKeyset(String),
}
