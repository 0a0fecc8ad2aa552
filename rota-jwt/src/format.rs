#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Compact JWS format (RFC 7515).
//!
//! A compact token is `base64url(header) . base64url(payload) .
//! base64url(signature)` with unpadded base64url throughout. The
//! signature covers the ASCII bytes of `header.payload` exactly as
//! they appear on the wire, so those segments are kept as-is and never
//! re-encoded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::JwtError;

/// The three segments of a compact token, signature decoded.
#[derive(Debug, Clone)]
pub struct CompactParts<'a> {
    /// `header.payload`, the exact bytes the signature covers.
    pub signed: &'a str,
    /// The base64url header segment, undecoded.
    pub header: &'a str,
    /// The base64url payload segment, undecoded.
    pub payload: &'a str,
    /// The decoded signature bytes.
    pub signature: Vec<u8>,
}

/// Split a compact token into its three segments.
///
/// # Errors
/// Returns [`JwtError::Malformed`] unless the token has exactly three
/// dot-separated segments and the signature decodes.
pub fn split_compact(compact: &str) -> Result<CompactParts<'_>, JwtError> {
    let mut segments = compact.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(JwtError::Malformed("expected three dot-separated segments".to_string()));
    };

    let signed_len = header.len() + 1 + payload.len();
    let signed = compact.get(..signed_len).ok_or_else(|| {
        JwtError::Malformed("expected three dot-separated segments".to_string())
    })?;

    Ok(CompactParts { signed, header, payload, signature: decode_segment(signature)? })
}

/// Decode one unpadded base64url segment.
///
/// # Errors
/// Returns [`JwtError::Malformed`] if the segment is not valid
/// unpadded base64url.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, JwtError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::Malformed(format!("invalid base64url segment: {e}")))
}

/// Derive the `kid` header value bound to a key id: the unpadded
/// base64url encoding of the id's four big-endian bytes.
#[must_use]
pub fn derive_kid(key_id: u32) -> String {
    URL_SAFE_NO_PAD.encode(key_id.to_be_bytes())
}

/// Parse a decoded segment as a JSON object.
pub(crate) fn parse_json_object(bytes: &[u8], what: &str) -> Result<Map<String, Value>, JwtError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| JwtError::Malformed(format!("{what} is not valid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JwtError::Malformed(format!("{what} is not a JSON object"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_compact_token() {
        // "{}" . "{}" . 0x010203
        let parts = split_compact("e30.e30.AQID").unwrap();
        assert_eq!(parts.signed, "e30.e30");
        assert_eq!(parts.header, "e30");
        assert_eq!(parts.payload, "e30");
        assert_eq!(parts.signature, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert!(split_compact("onesegment").is_err());
        assert!(split_compact("a.b").is_err());
        assert!(split_compact("a.b.c.d").is_err());
    }

    #[test]
    fn rejects_padded_base64() {
        assert!(split_compact("e30.e30.AQID==").is_err());
    }

    #[test]
    fn kid_is_base64url_of_big_endian_id() {
        assert_eq!(derive_kid(0x01020304), "AQIDBA");
        assert_eq!(derive_kid(0), "AAAAAA");
    }

    #[test]
    fn header_must_be_a_json_object() {
        assert!(parse_json_object(b"{\"alg\":\"PS256\"}", "header").is_ok());
        assert!(parse_json_object(b"[1,2]", "header").is_err());
        assert!(parse_json_object(b"not json", "header").is_err());
    }
}
