//! Logic-signatures: program-derived authorization.
//!
//! An escrow logic-signature authorizes requests from the program's own
//! address. A delegated one carries the owner's signature over the program
//! and authorizes requests from the owner's address instead.

use crate::transaction::signed::{Authorization, MultisigSignature, SignedTransaction};
use crate::transaction::types::{Transaction, TransactionError, TransactionResult};
use crate::wallet::{account, Account, Address, MultisigDescriptor};

/// Compiled program plus its arguments and optional delegation signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSig {
    pub program: Vec<u8>,
    pub args: Vec<Vec<u8>>,
    pub signature: Option<[u8; 64]>,
    pub multisig: Option<MultisigSignature>,
}

impl LogicSig {
    pub fn new(program: Vec<u8>, args: Vec<Vec<u8>>) -> Self {
        Self {
            program,
            args,
            signature: None,
            multisig: None,
        }
    }

    pub fn program_address(&self) -> Address {
        Address::for_program(&self.program)
    }

    fn program_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(7 + self.program.len());
        message.extend_from_slice(b"Program");
        message.extend_from_slice(&self.program);
        message
    }
}

/// A logic-signature together with the address it authorizes.
#[derive(Debug, Clone)]
pub struct LogicSigAccount {
    lsig: LogicSig,
    delegator: Option<Address>,
}

impl LogicSigAccount {
    /// Escrow form: the program's address is the account.
    pub fn escrow(program: Vec<u8>, args: Vec<Vec<u8>>) -> Self {
        Self {
            lsig: LogicSig::new(program, args),
            delegator: None,
        }
    }

    /// Delegated form: `owner` signs the program so it may spend for them.
    pub fn delegated(program: Vec<u8>, args: Vec<Vec<u8>>, owner: &Account) -> Self {
        let mut lsig = LogicSig::new(program, args);
        lsig.signature = Some(owner.sign_program(&lsig.program));
        Self {
            lsig,
            delegator: Some(owner.address()),
        }
    }

    /// Multisig-delegated form, starting with `signer`'s slot.
    pub fn delegated_multisig(
        program: Vec<u8>,
        args: Vec<Vec<u8>>,
        descriptor: &MultisigDescriptor,
        signer: &Account,
    ) -> TransactionResult<Self> {
        let mut lsig = LogicSig::new(program, args);
        let mut msig = MultisigSignature::empty(descriptor);
        msig.sign_slot(descriptor, signer, &lsig.program_message())?;
        lsig.multisig = Some(msig);
        Ok(Self {
            lsig,
            delegator: Some(descriptor.address()),
        })
    }

    /// Add another member's slot to a multisig-delegated logic-signature.
    pub fn append_multisig(
        &mut self,
        descriptor: &MultisigDescriptor,
        signer: &Account,
    ) -> TransactionResult<()> {
        let message = self.lsig.program_message();
        match self.lsig.multisig.as_mut() {
            Some(msig) => msig.sign_slot(descriptor, signer, &message),
            None => Err(TransactionError::SignatureMismatch(
                "logic-signature is not multisig-delegated".to_string(),
            )),
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.delegator.is_some()
    }

    /// The address this logic-signature spends for.
    pub fn address(&self) -> Address {
        self.delegator
            .unwrap_or_else(|| self.lsig.program_address())
    }

    pub fn logic_sig(&self) -> &LogicSig {
        &self.lsig
    }

    /// Check the delegation signature against the delegator's key.
    pub fn verify_delegation(&self) -> bool {
        match (self.delegator, self.lsig.signature) {
            (None, None) => self.lsig.multisig.is_none(),
            (Some(owner), Some(sig)) => {
                account::verify_bytes(&owner, &self.lsig.program_message(), &sig)
            }
            (Some(_), None) => self.lsig.multisig.is_some(),
            (None, Some(_)) => false,
        }
    }

    pub fn sign_transaction(&self, txn: &Transaction) -> TransactionResult<SignedTransaction> {
        Ok(SignedTransaction::new(
            txn.clone(),
            Authorization::Logic(self.lsig.clone()),
            self.address(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::builder::tests::test_params;
    use crate::transaction::{Payment, TxnBuilder};

    const PROGRAM: [u8; 3] = [0x06, 0x81, 0x01];

    #[test]
    fn test_escrow_address_from_program() {
        let escrow = LogicSigAccount::escrow(PROGRAM.to_vec(), Vec::new());
        assert_eq!(escrow.address(), Address::for_program(&PROGRAM));
        assert!(!escrow.is_delegated());
        assert!(escrow.verify_delegation());
    }

    #[test]
    fn test_delegated_signature_verifies() {
        let owner = Account::from_seed(&[4u8; 32]);
        let delegated = LogicSigAccount::delegated(PROGRAM.to_vec(), vec![b"arg".to_vec()], &owner);
        assert_eq!(delegated.address(), owner.address());
        assert!(delegated.verify_delegation());
    }

    #[test]
    fn test_escrow_signing_has_no_auth_address() {
        let escrow = LogicSigAccount::escrow(PROGRAM.to_vec(), Vec::new());
        let txn = TxnBuilder::new(&test_params(), escrow.address(), Payment::new(Address::new([2u8; 32]), 5))
            .build()
            .unwrap();
        let signed = escrow.sign_transaction(&txn).unwrap();
        assert_eq!(signed.auth_address, None);

        let encoded = signed.encode().unwrap();
        assert!(encoded.windows(4).any(|w| w == b"lsig"));
    }

    #[test]
    fn test_multisig_delegation() {
        let a = Account::from_seed(&[1u8; 32]);
        let b = Account::from_seed(&[2u8; 32]);
        let descriptor = MultisigDescriptor::new(1, 2, vec![a.address(), b.address()]).unwrap();

        let mut lsig =
            LogicSigAccount::delegated_multisig(PROGRAM.to_vec(), Vec::new(), &descriptor, &a)
                .unwrap();
        lsig.append_multisig(&descriptor, &b).unwrap();

        assert_eq!(lsig.address(), descriptor.address());
        assert_eq!(lsig.logic_sig().multisig.as_ref().unwrap().signature_count(), 2);
    }

    #[test]
    fn test_append_to_single_delegation_fails() {
        let owner = Account::from_seed(&[4u8; 32]);
        let descriptor = MultisigDescriptor::new(1, 1, vec![owner.address()]).unwrap();
        let mut delegated = LogicSigAccount::delegated(PROGRAM.to_vec(), Vec::new(), &owner);
        assert!(delegated.append_multisig(&descriptor, &owner).is_err());
    }
}
