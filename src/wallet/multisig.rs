//! Threshold multisig descriptors.

use crate::encoding::sha512_256;
use crate::wallet::address::Address;
use crate::wallet::types::{WalletError, WalletResult};

/// The only multisig version the ledger accepts.
pub const MULTISIG_VERSION: u8 = 1;

/// Version, threshold and ordered member set of a composite account.
///
/// Immutable once built; the derived address depends on member order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigDescriptor {
    version: u8,
    threshold: u8,
    members: Vec<Address>,
}

impl MultisigDescriptor {
    pub fn new(version: u8, threshold: u8, members: Vec<Address>) -> WalletResult<Self> {
        if version != MULTISIG_VERSION {
            return Err(WalletError::InvalidMultisig(format!(
                "unsupported version {}",
                version
            )));
        }
        if members.is_empty() {
            return Err(WalletError::InvalidMultisig("no members".to_string()));
        }
        if members.len() > u8::MAX as usize {
            return Err(WalletError::InvalidMultisig(format!(
                "too many members: {}",
                members.len()
            )));
        }
        if threshold == 0 || threshold as usize > members.len() {
            return Err(WalletError::InvalidMultisig(format!(
                "threshold {} outside 1..={}",
                threshold,
                members.len()
            )));
        }
        Ok(Self {
            version,
            threshold,
            members,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }

    /// Position of `address` in the member list.
    pub fn member_index(&self, address: &Address) -> Option<usize> {
        self.members.iter().position(|member| member == address)
    }

    /// The composite address this descriptor controls.
    pub fn address(&self) -> Address {
        let mut preimage = Vec::with_capacity(12 + 2 + 32 * self.members.len());
        preimage.extend_from_slice(b"MultisigAddr");
        preimage.push(self.version);
        preimage.push(self.threshold);
        for member in &self.members {
            preimage.extend_from_slice(member.as_bytes());
        }
        Address::new(sha512_256(&[&preimage]))
    }
}
