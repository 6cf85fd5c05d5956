//! Decoding of application key/value state.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::blockchain::models::TealKeyValue;
use crate::encoding::base64_decode;

/// Type tag marking a byte-string value.
pub const BYTES_TYPE: u64 = 1;

/// A decoded state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Bytes(String),
    Uint(u64),
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Bytes(text) => f.write_str(text),
            StateValue::Uint(value) => write!(f, "{}", value),
        }
    }
}

/// Decode one entry: tag 1 is text, anything else an integer.
pub fn decode_entry(entry: &TealKeyValue) -> (String, StateValue) {
    let key = decode_text(&entry.key);
    let value = if entry.value.kind == BYTES_TYPE {
        StateValue::Bytes(decode_text(&entry.value.bytes))
    } else {
        StateValue::Uint(entry.value.uint)
    };
    (key, value)
}

pub fn decode_state(entries: &[TealKeyValue]) -> BTreeMap<String, StateValue> {
    entries.iter().map(decode_entry).collect()
}

// Undecodable payloads are shown as-is.
fn decode_text(encoded: &str) -> String {
    match base64_decode(encoded) {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => encoded.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::models::TealValue;
    use crate::encoding::base64_encode;

    fn entry(key: &str, kind: u64, bytes: &str, uint: u64) -> TealKeyValue {
        TealKeyValue {
            key: base64_encode(key.as_bytes()),
            value: TealValue {
                kind,
                bytes: bytes.to_string(),
                uint,
            },
        }
    }

    #[test]
    fn test_bytes_value_is_text() {
        let (key, value) = decode_entry(&entry("owner", 1, &base64_encode(b"alice"), 0));
        assert_eq!(key, "owner");
        assert_eq!(value, StateValue::Bytes("alice".to_string()));
    }

    #[test]
    fn test_other_tags_are_integers() {
        let (_, value) = decode_entry(&entry("counter", 2, "", 7));
        assert_eq!(value, StateValue::Uint(7));

        let (_, value) = decode_entry(&entry("counter", 0, "", 3));
        assert_eq!(value, StateValue::Uint(3));
    }

    #[test]
    fn test_decode_state_map() {
        let state = decode_state(&[
            entry("counter", 2, "", 7),
            entry("name", 1, &base64_encode(b"demo"), 0),
        ]);
        assert_eq!(state.len(), 2);
        assert_eq!(state["counter"].to_string(), "7");
        assert_eq!(state["name"].to_string(), "demo");
    }
}
