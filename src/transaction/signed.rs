//! Signed transactions and multisig signature assembly.

use serde_bytes::Bytes;

use crate::encoding::to_msgpack;
use crate::transaction::logicsig::LogicSig;
use crate::transaction::types::{Transaction, TransactionError, TransactionResult};
use crate::transaction::wire::{LogicSigWire, MultisigWire, SignedTxnWire, TxnWire};
use crate::wallet::{Account, Address, MultisigDescriptor};

/// How a transaction is authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Single([u8; 64]),
    Multisig(MultisigSignature),
    Logic(LogicSig),
}

/// A transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub authorization: Authorization,
    /// Set when the authorizing address differs from the sender (rekeyed).
    pub auth_address: Option<Address>,
}

impl SignedTransaction {
    pub(crate) fn new(
        transaction: Transaction,
        authorization: Authorization,
        authorizer: Address,
    ) -> Self {
        let auth_address = (authorizer != transaction.header.sender).then_some(authorizer);
        Self {
            transaction,
            authorization,
            auth_address,
        }
    }

    pub fn id(&self) -> TransactionResult<String> {
        self.transaction.id()
    }

    /// Canonical msgpack encoding for submission.
    pub fn encode(&self) -> TransactionResult<Vec<u8>> {
        let (sig, msig, lsig) = match &self.authorization {
            Authorization::Single(sig) => (Some(Bytes::new(sig)), None, None),
            Authorization::Multisig(msig) => (None, Some(MultisigWire::new(msig)), None),
            Authorization::Logic(lsig) => (None, None, Some(LogicSigWire::new(lsig))),
        };
        let wire = SignedTxnWire {
            lsig,
            msig,
            sgnr: self.auth_address,
            sig,
            txn: TxnWire::new(&self.transaction),
        };
        Ok(to_msgpack(&wire)?)
    }
}

impl Account {
    /// Sign `txn` with this account's key.
    ///
    /// Works for rekeyed senders too: the signed form then names this
    /// account as the authorizer.
    pub fn sign_transaction(&self, txn: &Transaction) -> TransactionResult<SignedTransaction> {
        let signature = self.sign_bytes(&txn.bytes_to_sign()?);
        Ok(SignedTransaction::new(
            txn.clone(),
            Authorization::Single(signature),
            self.address(),
        ))
    }
}

/// One member slot of a multisig signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsignature {
    pub public_key: Address,
    pub signature: Option<[u8; 64]>,
}

/// Partial or complete multisig signature; member order matches the
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSignature {
    pub version: u8,
    pub threshold: u8,
    pub subsignatures: Vec<Subsignature>,
}

impl MultisigSignature {
    /// All member slots, none signed yet.
    pub fn empty(descriptor: &MultisigDescriptor) -> Self {
        Self {
            version: descriptor.version(),
            threshold: descriptor.threshold(),
            subsignatures: descriptor
                .members()
                .iter()
                .map(|member| Subsignature {
                    public_key: *member,
                    signature: None,
                })
                .collect(),
        }
    }

    /// Fill `signer`'s slot with its signature over `message`.
    pub fn sign_slot(
        &mut self,
        descriptor: &MultisigDescriptor,
        signer: &Account,
        message: &[u8],
    ) -> TransactionResult<()> {
        let index = descriptor
            .member_index(&signer.address())
            .ok_or(TransactionError::NotMultisigMember(signer.address()))?;
        self.subsignatures[index].signature = Some(signer.sign_bytes(message));
        Ok(())
    }

    /// Number of filled slots.
    pub fn signature_count(&self) -> usize {
        self.subsignatures
            .iter()
            .filter(|sub| sub.signature.is_some())
            .count()
    }

    /// Combine slots from another partial signature of the same descriptor.
    pub fn merge(&mut self, other: &MultisigSignature) -> TransactionResult<()> {
        if self.version != other.version
            || self.threshold != other.threshold
            || self.subsignatures.len() != other.subsignatures.len()
        {
            return Err(TransactionError::SignatureMismatch(
                "multisig descriptors differ".to_string(),
            ));
        }
        for (mine, theirs) in self.subsignatures.iter_mut().zip(&other.subsignatures) {
            if mine.public_key != theirs.public_key {
                return Err(TransactionError::SignatureMismatch(
                    "member order differs".to_string(),
                ));
            }
            match (mine.signature, theirs.signature) {
                (None, Some(sig)) => mine.signature = Some(sig),
                (Some(a), Some(b)) if a != b => {
                    return Err(TransactionError::SignatureMismatch(format!(
                        "conflicting signatures for {}",
                        mine.public_key
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl MultisigDescriptor {
    /// Start a multisig-signed transaction with `signer`'s slot filled.
    pub fn sign_transaction(
        &self,
        txn: &Transaction,
        signer: &Account,
    ) -> TransactionResult<SignedTransaction> {
        let mut msig = MultisigSignature::empty(self);
        msig.sign_slot(self, signer, &txn.bytes_to_sign()?)?;
        Ok(SignedTransaction::new(
            txn.clone(),
            Authorization::Multisig(msig),
            self.address(),
        ))
    }

    /// Add `signer`'s slot to an already partially signed transaction.
    pub fn append_signature(
        &self,
        signed: &mut SignedTransaction,
        signer: &Account,
    ) -> TransactionResult<()> {
        let message = signed.transaction.bytes_to_sign()?;
        match &mut signed.authorization {
            Authorization::Multisig(msig) => msig.sign_slot(self, signer, &message),
            _ => Err(TransactionError::SignatureMismatch(
                "transaction is not multisig-signed".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::base64_encode;
    use crate::transaction::builder::tests::test_params;
    use crate::transaction::{Payment, TxnBuilder};
    use crate::wallet::account::verify_bytes;

    fn payment_from(sender: Address) -> Transaction {
        TxnBuilder::new(&test_params(), sender, Payment::new(Address::new([2u8; 32]), 1_000))
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_signature_verifies() {
        let account = Account::from_seed(&[1u8; 32]);
        let txn = payment_from(account.address());
        let signed = account.sign_transaction(&txn).unwrap();

        let Authorization::Single(sig) = signed.authorization else {
            panic!("expected single signature");
        };
        assert!(verify_bytes(&account.address(), &txn.bytes_to_sign().unwrap(), &sig));
        assert_eq!(signed.auth_address, None);
    }

    #[test]
    fn test_signed_payment_matches_reference_bytes() {
        let account = Account::from_seed(&[1u8; 32]);
        assert_eq!(
            account.address().to_string(),
            "RKEOHXLUBHYZL7KS3MWTZOS5OLFGOCN7DWKBEG7TOSEADNAPN5OOTUNSLE"
        );
        let txn = TxnBuilder::new(
            &test_params(),
            account.address(),
            Payment::new(Address::new([2u8; 32]), 5_000_000),
        )
        .note("hello")
        .build()
        .unwrap();

        assert_eq!(
            base64_encode(&txn.encode().unwrap()),
            "iqNhbXTOAExLQKNmZWXNA+iiZnbNA+ijZ2VurHRlc3RuZXQtdjEuMKJnaMQgSEhISEhISEhISEhISEhISEhISEhI\
             SEhISEhISEhISEiibHbNB9Ckbm90ZcQFaGVsbG+jcmN2xCACAgICAgICAgICAgICAgICAgICAgICAgICAgICAgIC\
             AqNzbmTEIIqI4910CfGV/VLbLTy6XXLKZwm/HZQSG/N0iAG0D29cpHR5cGWjcGF5"
        );
        assert_eq!(txn.id().unwrap(), "BI5UVJRWFRYCZKOHLIB6U466AKWKWXCDUL4ME3ZDJAHQGKKRICOA");

        let signed = account.sign_transaction(&txn).unwrap();
        assert_eq!(
            base64_encode(&signed.encode().unwrap()),
            "gqNzaWfEQLga/eZ7ZHHa2fC4AhkuAOk9uZagzW0Cp/D5hh5LkUXNyUc7GOFvYjkSO1wzDECiwmaavDDW37c35tbyfh\
             agawOjdHhuiqNhbXTOAExLQKNmZWXNA+iiZnbNA+ijZ2VurHRlc3RuZXQtdjEuMKJnaMQgSEhISEhISEhISEhISEhI\
             SEhISEhISEhISEhISEhISEiibHbNB9Ckbm90ZcQFaGVsbG+jcmN2xCACAgICAgICAgICAgICAgICAgICAgICAgICAgIC\
             AgICAqNzbmTEIIqI4910CfGV/VLbLTy6XXLKZwm/HZQSG/N0iAG0D29cpHR5cGWjcGF5"
        );
    }

    #[test]
    fn test_rekeyed_signer_sets_auth_address() {
        let sender = Account::from_seed(&[1u8; 32]);
        let delegate = Account::from_seed(&[2u8; 32]);
        let signed = delegate.sign_transaction(&payment_from(sender.address())).unwrap();
        assert_eq!(signed.auth_address, Some(delegate.address()));

        let encoded = signed.encode().unwrap();
        assert!(encoded.windows(4).any(|w| w == b"sgnr"));
    }

    #[test]
    fn test_signed_encoding_keys() {
        let account = Account::from_seed(&[1u8; 32]);
        let signed = account.sign_transaction(&payment_from(account.address())).unwrap();
        let encoded = signed.encode().unwrap();
        // fixmap(2): sig, txn
        assert_eq!(encoded[0], 0x82);
        assert_eq!(&encoded[1..5], b"\xa3sig");
    }

    #[test]
    fn test_multisig_sign_and_append() {
        let a = Account::from_seed(&[1u8; 32]);
        let b = Account::from_seed(&[2u8; 32]);
        let c = Account::from_seed(&[3u8; 32]);
        let descriptor =
            MultisigDescriptor::new(1, 2, vec![a.address(), b.address(), c.address()]).unwrap();

        let txn = payment_from(descriptor.address());
        let mut signed = descriptor.sign_transaction(&txn, &a).unwrap();
        descriptor.append_signature(&mut signed, &c).unwrap();

        let Authorization::Multisig(msig) = &signed.authorization else {
            panic!("expected multisig");
        };
        assert_eq!(msig.signature_count(), 2);
        assert!(msig.subsignatures[1].signature.is_none());
        assert_eq!(signed.auth_address, None);
    }

    #[test]
    fn test_multisig_rejects_non_member() {
        let a = Account::from_seed(&[1u8; 32]);
        let outsider = Account::from_seed(&[9u8; 32]);
        let descriptor = MultisigDescriptor::new(1, 1, vec![a.address()]).unwrap();
        let err = descriptor
            .sign_transaction(&payment_from(descriptor.address()), &outsider)
            .unwrap_err();
        assert!(matches!(err, TransactionError::NotMultisigMember(_)));
    }

    #[test]
    fn test_merge_partial_signatures() {
        let a = Account::from_seed(&[1u8; 32]);
        let b = Account::from_seed(&[2u8; 32]);
        let descriptor = MultisigDescriptor::new(1, 2, vec![a.address(), b.address()]).unwrap();
        let txn = payment_from(descriptor.address());

        let from_a = descriptor.sign_transaction(&txn, &a).unwrap();
        let from_b = descriptor.sign_transaction(&txn, &b).unwrap();
        let (Authorization::Multisig(mut left), Authorization::Multisig(right)) =
            (from_a.authorization, from_b.authorization)
        else {
            panic!("expected multisig");
        };
        left.merge(&right).unwrap();
        assert_eq!(left.signature_count(), 2);
    }
}
