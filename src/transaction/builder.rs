//! Transaction construction from network parameters.

use crate::encoding::{base32_encode, sha512_256, to_msgpack};
use crate::transaction::types::{
    Header, SuggestedParams, Transaction, TransactionKind, TransactionResult,
};
use crate::transaction::wire::TxnWire;
use crate::transaction::AssetTransfer;
use crate::wallet::Address;

/// Bytes a single ed25519 signature adds to an encoded transaction
/// (map header, `sig` key and value, `txn` key).
const SIGNATURE_OVERHEAD: u64 = 75;

/// Builder for a single transaction request.
pub struct TxnBuilder {
    params: SuggestedParams,
    sender: Address,
    kind: TransactionKind,
    note: Vec<u8>,
    lease: Option<[u8; 32]>,
    rekey_to: Option<Address>,
    flat_fee: Option<u64>,
}

impl TxnBuilder {
    /// Start a request from `sender` using the fetched parameters.
    pub fn new(params: &SuggestedParams, sender: Address, kind: impl Into<TransactionKind>) -> Self {
        Self {
            params: params.clone(),
            sender,
            kind: kind.into(),
            note: Vec::new(),
            lease: None,
            rekey_to: None,
            flat_fee: None,
        }
    }

    pub fn note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.note = note.into();
        self
    }

    /// Mutual-exclusion lease: no other request from the sender with the
    /// same lease may land while this one is valid.
    pub fn lease(mut self, lease: [u8; 32]) -> Self {
        self.lease = Some(lease);
        self
    }

    /// Make `target` the signer for all future requests from the sender.
    pub fn rekey_to(mut self, target: Address) -> Self {
        self.rekey_to = Some(target);
        self
    }

    /// Pay exactly `fee`, e.g. to cover inner or grouped transactions.
    pub fn flat_fee(mut self, fee: u64) -> Self {
        self.flat_fee = Some(fee);
        self
    }

    pub fn build(self) -> TransactionResult<Transaction> {
        let params = self.params;
        let mut txn = Transaction {
            header: Header {
                sender: self.sender,
                fee: params.fee,
                first_valid: params.first_valid,
                last_valid: params.last_valid,
                genesis_id: params.genesis_id,
                genesis_hash: params.genesis_hash,
                note: self.note,
                lease: self.lease,
                rekey_to: self.rekey_to,
                group: None,
            },
            kind: self.kind,
        };

        txn.header.fee = match self.flat_fee {
            Some(fee) => fee,
            None if params.flat_fee => params.fee,
            None => {
                let size = txn.encode()?.len() as u64 + SIGNATURE_OVERHEAD;
                params.fee.saturating_mul(size).max(params.min_fee)
            }
        };
        Ok(txn)
    }
}

impl Transaction {
    pub fn sender(&self) -> Address {
        self.header.sender
    }

    /// Canonical msgpack encoding of the request.
    pub fn encode(&self) -> TransactionResult<Vec<u8>> {
        Ok(to_msgpack(&TxnWire::new(self))?)
    }

    /// Domain-separated bytes that signers sign.
    pub fn bytes_to_sign(&self) -> TransactionResult<Vec<u8>> {
        let encoded = self.encode()?;
        let mut message = Vec::with_capacity(2 + encoded.len());
        message.extend_from_slice(b"TX");
        message.extend_from_slice(&encoded);
        Ok(message)
    }

    pub fn raw_id(&self) -> TransactionResult<[u8; 32]> {
        Ok(sha512_256(&[&self.bytes_to_sign()?]))
    }

    /// Base32 transaction id as reported by the node.
    pub fn id(&self) -> TransactionResult<String> {
        Ok(base32_encode(&self.raw_id()?))
    }

    /// True for the zero-amount self-transfer that opts into an asset.
    pub fn is_asset_opt_in(&self) -> bool {
        match &self.kind {
            TransactionKind::AssetTransfer(AssetTransfer {
                asset_id,
                amount,
                receiver,
                close_to,
                revocation_target,
            }) => {
                *asset_id != 0
                    && *amount == 0
                    && *receiver == self.header.sender
                    && close_to.is_none()
                    && revocation_target.is_none()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transaction::{ApplicationCall, AssetConfig, AssetParams, Payment, StateSchema};

    pub(crate) fn test_params() -> SuggestedParams {
        SuggestedParams {
            fee: 0,
            min_fee: 1000,
            flat_fee: false,
            first_valid: 1000,
            last_valid: 2000,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: [0x48; 32],
        }
    }

    fn sender() -> Address {
        Address::new([1u8; 32])
    }

    #[test]
    fn test_min_fee_applies() {
        let txn = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        assert_eq!(txn.header.fee, 1000);
        assert_eq!(txn.header.first_valid, 1000);
        assert_eq!(txn.header.last_valid, 2000);
    }

    #[test]
    fn test_per_byte_fee_scales_with_size() {
        let mut params = test_params();
        params.fee = 10;
        let small = TxnBuilder::new(&params, sender(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        let large = TxnBuilder::new(&params, sender(), Payment::new(Address::new([2u8; 32]), 5))
            .note(vec![0xaa; 512])
            .build()
            .unwrap();
        assert!(large.header.fee > small.header.fee);
        assert!(small.header.fee >= 1000);
    }

    #[test]
    fn test_flat_fee() {
        let txn = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .flat_fee(2000)
            .build()
            .unwrap();
        assert_eq!(txn.header.fee, 2000);
    }

    #[test]
    fn test_opt_in_shape_builds_offline() {
        let txn = TxnBuilder::new(&test_params(), sender(), AssetTransfer::opt_in(sender(), 31566704))
            .build()
            .unwrap();
        assert!(txn.is_asset_opt_in());
        assert!(txn.encode().is_ok());

        let transfer = TxnBuilder::new(
            &test_params(),
            sender(),
            AssetTransfer::new(31566704, Address::new([2u8; 32]), 0),
        )
        .build()
        .unwrap();
        assert!(!transfer.is_asset_opt_in());
    }

    #[test]
    fn test_id_is_stable_and_base32() {
        let txn = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        let id = txn.id().unwrap();
        assert_eq!(id.len(), 52);
        assert_eq!(id, txn.clone().id().unwrap());
    }

    #[test]
    fn test_note_changes_id() {
        let plain = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        let noted = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .note("hello")
            .build()
            .unwrap();
        assert_ne!(plain.id().unwrap(), noted.id().unwrap());
    }

    #[test]
    fn test_encoding_starts_with_sorted_keys() {
        let txn = TxnBuilder::new(&test_params(), sender(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        let encoded = txn.encode().unwrap();
        // amt, fee, fv, gen, gh, lv, rcv, snd, type
        assert_eq!(encoded[0], 0x89);
        assert_eq!(&encoded[1..5], b"\xa3amt");
    }

    #[test]
    fn test_rekey_and_lease_are_encoded() {
        let base = TxnBuilder::new(&test_params(), sender(), Payment::new(sender(), 0))
            .build()
            .unwrap();
        let rekeyed = TxnBuilder::new(&test_params(), sender(), Payment::new(sender(), 0))
            .rekey_to(Address::new([5u8; 32]))
            .lease([7u8; 32])
            .build()
            .unwrap();
        assert_eq!(rekeyed.header.rekey_to, Some(Address::new([5u8; 32])));
        assert!(rekeyed.encode().unwrap().len() > base.encode().unwrap().len() + 64);
    }

    #[test]
    fn test_other_kinds_encode() {
        let create = TxnBuilder::new(
            &test_params(),
            sender(),
            AssetConfig::create(AssetParams {
                total: 1000,
                decimals: 0,
                unit_name: "LATINUM".to_string(),
                asset_name: "latinum".to_string(),
                manager: Some(sender()),
                ..AssetParams::default()
            }),
        )
        .build()
        .unwrap();
        assert!(create.encode().is_ok());

        let app = TxnBuilder::new(
            &test_params(),
            sender(),
            ApplicationCall::create(vec![0x06, 0x81, 0x01], vec![0x06, 0x81, 0x01], StateSchema::new(1, 0), StateSchema::new(1, 0)),
        )
        .build()
        .unwrap();
        assert!(app.encode().is_ok());
    }
}
