//! Shared encodings for identifiers and wire payloads.
//!
//! # Responsibilities
//! - SHA-512/256 digests for addresses, ids and selectors
//! - Base32 (no padding) for addresses and transaction ids
//! - Base64 for REST payloads
//! - Canonical msgpack (sorted keys, empty values omitted)

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use data_encoding::BASE32_NOPAD;
use serde::Serialize;
use sha2::{Digest, Sha512_256};

/// SHA-512/256 of the concatenated parts.
pub fn sha512_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

pub fn base32_encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

pub fn base32_decode(text: &str) -> Option<Vec<u8>> {
    BASE32_NOPAD.decode(text.as_bytes()).ok()
}

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_decode(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text).ok()
}

/// Encode a value as canonical msgpack.
///
/// Wire structs declare their fields in lexicographic key order and skip
/// empty values, so the derived map encoding is canonical.
pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Serde predicate for omitting zero integers.
pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
