#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Output Prefixes
//!
//! Every key's wire format emits a short binary tag — the output prefix —
//! identifying which key (or key-format variant) produced a message. Raw
//! keys emit no tag. The container layer in `rota-core` treats prefixes
//! as opaque byte keys in its bucket index; the variant-specific rule for
//! computing them lives here, as a pure function of [`KeyMetadata`].

use std::borrow::Borrow;

use crate::key::{KeyMetadata, OutputPrefixVariant};

/// Length in bytes of every non-raw output prefix.
pub const NON_RAW_PREFIX_LEN: usize = 5;

/// Leading byte of a Tink-variant prefix.
const TINK_START_BYTE: u8 = 0x01;

/// Leading byte of a Crunchy or Legacy prefix.
const LEGACY_START_BYTE: u8 = 0x00;

/// An opaque byte sequence identifying a key's wire-format tag.
///
/// Possibly empty (all raw keys share the empty prefix). Two distinct
/// keys may share a prefix; the container resolves collisions by trying
/// every same-prefix candidate in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputPrefix(Vec<u8>);

impl OutputPrefix {
    /// The empty prefix shared by all raw keys.
    #[must_use]
    pub fn raw() -> Self {
        Self(Vec::new())
    }

    /// Wrap already-computed prefix bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The prefix bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the prefix in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty (raw) prefix.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Allows bucket lookup by `&[u8]` without allocating an OutputPrefix.
impl Borrow<[u8]> for OutputPrefix {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

/// Compute the output prefix for a key.
///
/// Deterministic and fixed-length per variant: 5 bytes embedding the
/// big-endian key id for [`Tink`](OutputPrefixVariant::Tink),
/// [`Crunchy`](OutputPrefixVariant::Crunchy) and
/// [`Legacy`](OutputPrefixVariant::Legacy) (the latter two share the
/// `0x00` start byte), and the empty sequence for
/// [`Raw`](OutputPrefixVariant::Raw).
#[must_use]
pub fn output_prefix(metadata: &KeyMetadata) -> OutputPrefix {
    let start_byte = match metadata.variant() {
        OutputPrefixVariant::Tink => TINK_START_BYTE,
        OutputPrefixVariant::Crunchy | OutputPrefixVariant::Legacy => LEGACY_START_BYTE,
        OutputPrefixVariant::Raw => return OutputPrefix::raw(),
    };

    let mut bytes = Vec::with_capacity(NON_RAW_PREFIX_LEN);
    bytes.push(start_byte);
    bytes.extend_from_slice(&metadata.key_id().to_be_bytes());
    OutputPrefix(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::key::KeyStatus;

    fn meta(key_id: u32, variant: OutputPrefixVariant) -> KeyMetadata {
        KeyMetadata::new(key_id, KeyStatus::Enabled, variant)
    }

    #[test]
    fn tink_prefix_embeds_big_endian_key_id() {
        let prefix = output_prefix(&meta(0x0102_0304, OutputPrefixVariant::Tink));
        assert_eq!(prefix.as_bytes(), &[0x01, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(prefix.len(), NON_RAW_PREFIX_LEN);
    }

    #[test]
    fn crunchy_and_legacy_share_the_zero_start_byte() {
        let crunchy = output_prefix(&meta(7, OutputPrefixVariant::Crunchy));
        let legacy = output_prefix(&meta(7, OutputPrefixVariant::Legacy));
        assert_eq!(crunchy, legacy);
        assert_eq!(crunchy.as_bytes(), &[0x00, 0x00, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn raw_prefix_is_empty() {
        let prefix = output_prefix(&meta(7, OutputPrefixVariant::Raw));
        assert!(prefix.is_empty());
        assert_eq!(prefix, OutputPrefix::raw());
    }

    #[test]
    fn prefix_is_deterministic() {
        let a = output_prefix(&meta(99, OutputPrefixVariant::Tink));
        let b = output_prefix(&meta(99, OutputPrefixVariant::Tink));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_key_ids_give_distinct_prefixes() {
        let a = output_prefix(&meta(1, OutputPrefixVariant::Tink));
        let b = output_prefix(&meta(2, OutputPrefixVariant::Tink));
        assert_ne!(a, b);
    }

    #[test]
    fn borrow_allows_slice_keyed_lookup() {
        use std::collections::HashMap;

        let prefix = output_prefix(&meta(5, OutputPrefixVariant::Tink));
        let mut map: HashMap<OutputPrefix, u32> = HashMap::new();
        map.insert(prefix.clone(), 5);

        let bytes: &[u8] = prefix.as_bytes();
        assert_eq!(map.get(bytes), Some(&5));
    }
}
