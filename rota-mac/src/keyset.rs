#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Keyset MAC Wrapper
//!
//! Computation always uses the primary key and prepends its output
//! prefix to the tag. Verification strips the candidate prefix, tries
//! every entry in the matching bucket in insertion order, then falls
//! back to the raw-key bucket with the full tag. Legacy-variant keys
//! authenticate `data || 0x00` instead of `data`; the version byte is
//! a wire-compatibility quirk that never leaves this module.

use std::sync::Arc;

use rota_core::{Entry, PrimitiveSet};
use rota_types::{OutputPrefixVariant, NON_RAW_PREFIX_LEN};

use crate::{Mac, MacError};

/// MAC over every enabled key of a keyset.
///
/// Cheap to clone; all clones share the same frozen container.
#[derive(Clone)]
pub struct KeysetMac {
    primitives: Arc<PrimitiveSet<Box<dyn Mac>>>,
}

impl KeysetMac {
    /// Wrap a frozen container.
    ///
    /// # Errors
    /// Returns [`MacError::MissingPrimary`] if the container has no
    /// primary entry: a tag-producing family cannot operate without
    /// one.
    pub fn new(primitives: Arc<PrimitiveSet<Box<dyn Mac>>>) -> Result<Self, MacError> {
        if primitives.primary().is_none() {
            return Err(MacError::MissingPrimary);
        }
        Ok(Self { primitives })
    }
}

impl std::fmt::Debug for KeysetMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetMac")
            .field("keys", &self.primitives.entries_in_keyset_order().len())
            .finish_non_exhaustive()
    }
}

/// Compute or verify against the bytes the entry actually
/// authenticates: Legacy keys sign a trailing version byte.
fn authenticated_bytes<'a>(entry: &Entry<Box<dyn Mac>>, data: &'a [u8]) -> std::borrow::Cow<'a, [u8]> {
    if entry.metadata().variant() == OutputPrefixVariant::Legacy {
        let mut with_version = Vec::with_capacity(data.len() + 1);
        with_version.extend_from_slice(data);
        with_version.push(0x00);
        std::borrow::Cow::Owned(with_version)
    } else {
        std::borrow::Cow::Borrowed(data)
    }
}

impl Mac for KeysetMac {
    fn compute(&self, data: &[u8]) -> Result<Vec<u8>, MacError> {
        let primary = self.primitives.primary().ok_or(MacError::MissingPrimary)?;
        let raw = primary.primitive().compute(&authenticated_bytes(primary, data))?;

        let prefix = primary.output_prefix().as_bytes();
        let mut out = Vec::with_capacity(prefix.len() + raw.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(&raw);
        Ok(out)
    }

    fn verify(&self, tag: &[u8], data: &[u8]) -> Result<(), MacError> {
        // Explicitly prefixed candidates first.
        if tag.len() >= NON_RAW_PREFIX_LEN {
            let (prefix, body) = tag.split_at(NON_RAW_PREFIX_LEN);
            for entry in self.primitives.entries_for_prefix(prefix) {
                let bytes = authenticated_bytes(entry, data);
                if entry.primitive().verify(body, &bytes).is_ok() {
                    return Ok(());
                }
            }
        }

        // Raw keys see the whole tag.
        for entry in self.primitives.raw_entries() {
            if entry.primitive().verify(tag, data).is_ok() {
                return Ok(());
            }
        }

        Err(MacError::InvalidTag)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::expect_used)]
mod tests {
    use rota_core::PrimitiveSetBuilder;
    use rota_types::{KeyMetadata, KeyStatus};

    use super::*;
    use crate::hmac_sha256::{HmacSha256, HmacSha256Key};

    fn add_key(
        builder: &mut PrimitiveSetBuilder<Box<dyn Mac>>,
        key: &HmacSha256Key,
        key_id: u32,
        variant: OutputPrefixVariant,
        primary: bool,
    ) {
        let primitive: Box<dyn Mac> = Box::new(HmacSha256::new(key));
        let metadata = KeyMetadata::new(key_id, KeyStatus::Enabled, variant);
        let descriptor = Arc::new(key.clone());
        if primary {
            builder.add_primary(primitive, descriptor, metadata).unwrap();
        } else {
            builder.add(primitive, descriptor, metadata).unwrap();
        }
    }

    fn single_key_mac(key: &HmacSha256Key, key_id: u32, variant: OutputPrefixVariant) -> KeysetMac {
        let mut builder = PrimitiveSet::builder();
        add_key(&mut builder, key, key_id, variant, true);
        KeysetMac::new(Arc::new(builder.build().unwrap())).unwrap()
    }

    #[test]
    fn compute_prepends_the_primary_prefix() {
        let key = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 0xAABBCCDD, OutputPrefixVariant::Tink);

        let tag = mac.compute(b"msg").unwrap();
        assert_eq!(&tag[..5], &[0x01, 0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(tag.len(), 5 + 32);
        mac.verify(&tag, b"msg").unwrap();
    }

    #[test]
    fn raw_primary_emits_a_bare_tag() {
        let key = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 1, OutputPrefixVariant::Raw);

        let tag = mac.compute(b"msg").unwrap();
        assert_eq!(tag.len(), 32);
        mac.verify(&tag, b"msg").unwrap();
    }

    #[test]
    fn old_tags_survive_rotation() {
        let old_key = HmacSha256Key::generate();
        let new_key = HmacSha256Key::generate();

        let before = single_key_mac(&old_key, 1, OutputPrefixVariant::Tink);
        let old_tag = before.compute(b"pre-rotation").unwrap();

        let mut builder = PrimitiveSet::builder();
        add_key(&mut builder, &old_key, 1, OutputPrefixVariant::Tink, false);
        add_key(&mut builder, &new_key, 2, OutputPrefixVariant::Tink, true);
        let after = KeysetMac::new(Arc::new(builder.build().unwrap())).unwrap();

        after.verify(&old_tag, b"pre-rotation").unwrap();

        let new_tag = after.compute(b"post-rotation").unwrap();
        assert_eq!(&new_tag[..5], &[0x01, 0x00, 0x00, 0x00, 0x02]);
        after.verify(&new_tag, b"post-rotation").unwrap();
    }

    #[test]
    fn raw_keys_are_the_fallback_bucket() {
        let raw_key = HmacSha256Key::generate();
        let tink_key = HmacSha256Key::generate();

        let raw_only = single_key_mac(&raw_key, 1, OutputPrefixVariant::Raw);
        let bare_tag = raw_only.compute(b"legacy data").unwrap();

        let mut builder = PrimitiveSet::builder();
        add_key(&mut builder, &tink_key, 2, OutputPrefixVariant::Tink, true);
        add_key(&mut builder, &raw_key, 1, OutputPrefixVariant::Raw, false);
        let mixed = KeysetMac::new(Arc::new(builder.build().unwrap())).unwrap();

        mixed.verify(&bare_tag, b"legacy data").unwrap();
    }

    #[test]
    fn legacy_keys_authenticate_the_version_byte() {
        let key = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 0x01020304, OutputPrefixVariant::Legacy);

        let tag = mac.compute(b"msg").unwrap();
        assert_eq!(&tag[..5], &[0x00, 0x01, 0x02, 0x03, 0x04]);
        mac.verify(&tag, b"msg").unwrap();

        // The underlying MAC signed `msg || 0x00`, not `msg`.
        let inner = HmacSha256::new(&key);
        inner.verify(&tag[5..], b"msg\x00").unwrap();
        assert!(inner.verify(&tag[5..], b"msg").is_err());
    }

    #[test]
    fn crunchy_and_legacy_share_a_prefix_byte() {
        let key = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 0x01020304, OutputPrefixVariant::Crunchy);

        let tag = mac.compute(b"msg").unwrap();
        assert_eq!(&tag[..5], &[0x00, 0x01, 0x02, 0x03, 0x04]);
        // Crunchy signs the data as-is.
        HmacSha256::new(&key).verify(&tag[5..], b"msg").unwrap();
        mac.verify(&tag, b"msg").unwrap();
    }

    #[test]
    fn failure_is_one_generic_error() {
        let key = HmacSha256Key::generate();
        let other = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 7, OutputPrefixVariant::Tink);
        let foreign = single_key_mac(&other, 7, OutputPrefixVariant::Tink);

        // Same prefix, wrong key: candidate is tried and fails.
        let tag = foreign.compute(b"msg").unwrap();
        let err = mac.verify(&tag, b"msg").unwrap_err();
        assert_eq!(err, MacError::InvalidTag);
        assert_eq!(err.to_string(), "invalid MAC");
    }

    #[test]
    fn short_garbage_is_rejected() {
        let key = HmacSha256Key::generate();
        let mac = single_key_mac(&key, 1, OutputPrefixVariant::Tink);
        assert_eq!(mac.verify(&[0x01, 0x02], b"msg").unwrap_err(), MacError::InvalidTag);
    }

    #[test]
    fn wrapping_a_primary_less_container_fails() {
        let key = HmacSha256Key::generate();
        let mut builder = PrimitiveSet::builder();
        add_key(&mut builder, &key, 1, OutputPrefixVariant::Tink, false);
        let err = KeysetMac::new(Arc::new(builder.build().unwrap())).unwrap_err();
        assert_eq!(err, MacError::MissingPrimary);
    }
}
