//! The signing seam shared by accounts, logic-signatures and multisigs.

use crate::transaction::logicsig::LogicSigAccount;
use crate::transaction::signed::SignedTransaction;
use crate::transaction::types::{Transaction, TransactionError, TransactionResult};
use crate::wallet::{Account, Address, MultisigDescriptor};

/// Anything that can authorize a transaction.
pub trait TransactionSigner: Send + Sync {
    /// The address whose authority this signer carries.
    fn address(&self) -> Address;

    fn sign(&self, txn: &Transaction) -> TransactionResult<SignedTransaction>;
}

impl TransactionSigner for Account {
    fn address(&self) -> Address {
        Account::address(self)
    }

    fn sign(&self, txn: &Transaction) -> TransactionResult<SignedTransaction> {
        self.sign_transaction(txn)
    }
}

impl TransactionSigner for LogicSigAccount {
    fn address(&self) -> Address {
        LogicSigAccount::address(self)
    }

    fn sign(&self, txn: &Transaction) -> TransactionResult<SignedTransaction> {
        self.sign_transaction(txn)
    }
}

/// A multisig descriptor with the member accounts available locally.
#[derive(Debug, Clone)]
pub struct MultisigSigner {
    descriptor: MultisigDescriptor,
    members: Vec<Account>,
}

impl MultisigSigner {
    pub fn new(descriptor: MultisigDescriptor, members: Vec<Account>) -> TransactionResult<Self> {
        if let Some(outsider) = members
            .iter()
            .find(|member| descriptor.member_index(&member.address()).is_none())
        {
            return Err(TransactionError::NotMultisigMember(outsider.address()));
        }
        if members.is_empty() {
            return Err(TransactionError::SignatureMismatch(
                "no member accounts supplied".to_string(),
            ));
        }
        Ok(Self {
            descriptor,
            members,
        })
    }

    pub fn descriptor(&self) -> &MultisigDescriptor {
        &self.descriptor
    }
}

impl TransactionSigner for MultisigSigner {
    fn address(&self) -> Address {
        self.descriptor.address()
    }

    fn sign(&self, txn: &Transaction) -> TransactionResult<SignedTransaction> {
        let (first, rest) = self
            .members
            .split_first()
            .ok_or_else(|| TransactionError::SignatureMismatch("no member accounts".to_string()))?;
        let mut signed = self.descriptor.sign_transaction(txn, first)?;
        for member in rest {
            self.descriptor.append_signature(&mut signed, member)?;
        }
        Ok(signed)
    }
}
