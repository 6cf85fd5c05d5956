//! Ledger addresses and their checksummed text form.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::encoding::{base32_decode, base32_encode, sha512_256};
use crate::wallet::types::WalletError;

const CHECKSUM_LEN: usize = 4;

/// Text length of an encoded address.
pub const ADDRESS_TEXT_LEN: usize = 58;

/// A 32-byte account identifier (ed25519 public key or derived digest).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Escrow address controlled by a compiled program.
    pub fn for_program(program: &[u8]) -> Self {
        Self(sha512_256(&[b"Program", program]))
    }

    /// Escrow address of a deployed application.
    pub fn for_application(app_id: u64) -> Self {
        Self(sha512_256(&[b"appID", &app_id.to_be_bytes()]))
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = sha512_256(&[&self.0]);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[32 - CHECKSUM_LEN..]);
        checksum
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(32 + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&base32_encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_TEXT_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "expected {} characters, got {}",
                ADDRESS_TEXT_LEN,
                s.len()
            )));
        }

        let raw = base32_decode(s)
            .ok_or_else(|| WalletError::InvalidAddress("not valid base32".to_string()))?;
        if raw.len() != 32 + CHECKSUM_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "decoded to {} bytes",
                raw.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&raw[..32]);
        let address = Address(key);
        if address.checksum()[..] != raw[32..] {
            return Err(WalletError::InvalidAddress("checksum mismatch".to_string()));
        }
        Ok(address)
    }
}

// Addresses travel as raw 32-byte strings inside msgpack requests.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}
