//! Atomic groups.
//!
//! All requests in a group carry one shared identifier and the ledger
//! includes them all or none. Assigning the identifier is the only local
//! step; atomicity itself is enforced remotely.

use serde_bytes::Bytes;

use crate::encoding::{sha512_256, to_msgpack};
use crate::transaction::types::{Transaction, TransactionError, TransactionResult, MAX_GROUP_SIZE};
use crate::transaction::wire::GroupWire;

/// Compute the group identifier for `txns` in their current order.
pub fn compute_group_id(txns: &[Transaction]) -> TransactionResult<[u8; 32]> {
    if txns.is_empty() {
        return Err(TransactionError::EmptyGroup);
    }
    if txns.len() > MAX_GROUP_SIZE {
        return Err(TransactionError::GroupTooLarge(txns.len()));
    }

    let ids = txns
        .iter()
        .map(|txn| {
            // A previous group id is not part of the member id.
            let mut member = txn.clone();
            member.header.group = None;
            member.raw_id()
        })
        .collect::<TransactionResult<Vec<[u8; 32]>>>()?;

    let wire = GroupWire {
        txlist: ids.iter().map(|id| Bytes::new(id)).collect(),
    };
    let encoded = to_msgpack(&wire)?;
    Ok(sha512_256(&[b"TG", &encoded]))
}

/// Compute the group identifier and write it into every request.
pub fn assign_group_id(txns: &mut [Transaction]) -> TransactionResult<[u8; 32]> {
    let group = compute_group_id(txns)?;
    for txn in txns.iter_mut() {
        txn.header.group = Some(group);
    }
    Ok(group)
}
