//! Payments, rekeying and account closing.

use crate::blockchain::LedgerResult;
use crate::transaction::{Payment, TransactionSigner, TxnBuilder};
use crate::wallet::Address;
use crate::workflows::{Confirmation, WorkflowRunner};

/// Business fields of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRequest {
    pub receiver: Address,
    pub amount: u64,
    pub note: Option<Vec<u8>>,
    pub lease: Option<[u8; 32]>,
    pub rekey_to: Option<Address>,
    pub close_remainder_to: Option<Address>,
    /// Sender when it differs from the signer (a rekeyed account).
    pub sender: Option<Address>,
}

impl PaymentRequest {
    pub fn new(receiver: Address, amount: u64) -> Self {
        Self {
            receiver,
            amount,
            ..Self::default()
        }
    }

    pub fn note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn lease(mut self, lease: [u8; 32]) -> Self {
        self.lease = Some(lease);
        self
    }

    /// Hand signing authority for the sender to `target` once confirmed.
    pub fn rekey_to(mut self, target: Address) -> Self {
        self.rekey_to = Some(target);
        self
    }

    pub fn close_remainder_to(mut self, target: Address) -> Self {
        self.close_remainder_to = Some(target);
        self
    }

    pub fn from_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }
}

impl WorkflowRunner {
    pub async fn send_payment(
        &self,
        signer: &dyn TransactionSigner,
        request: PaymentRequest,
    ) -> LedgerResult<Confirmation> {
        self.run("send_payment", self.pay("send_payment", signer, request))
            .await
    }

    /// Zero-amount self-payment that moves signing authority to `new_authority`.
    pub async fn rekey_account(
        &self,
        account: &dyn TransactionSigner,
        new_authority: Address,
    ) -> LedgerResult<Confirmation> {
        let sender = account.address();
        let request = PaymentRequest::new(sender, 0).rekey_to(new_authority);
        self.run("rekey_account", self.pay("rekey_account", account, request))
            .await
    }

    /// Send the whole remaining balance to `close_to` and close the account.
    pub async fn close_account(
        &self,
        account: &dyn TransactionSigner,
        close_to: Address,
    ) -> LedgerResult<Confirmation> {
        let request = PaymentRequest::new(close_to, 0).close_remainder_to(close_to);
        self.run("close_account", self.pay("close_account", account, request))
            .await
    }

    async fn pay(
        &self,
        operation: &'static str,
        signer: &dyn TransactionSigner,
        request: PaymentRequest,
    ) -> LedgerResult<Confirmation> {
        let sender = request.sender.unwrap_or_else(|| signer.address());
        let mut payment = Payment::new(request.receiver, request.amount);
        if let Some(target) = request.close_remainder_to {
            payment = payment.close_remainder_to(target);
        }

        let params = self.params().await?;
        let mut builder = TxnBuilder::new(&params, sender, payment);
        if let Some(note) = request.note {
            builder = builder.note(note);
        }
        if let Some(lease) = request.lease {
            builder = builder.lease(lease);
        }
        if let Some(target) = request.rekey_to {
            builder = builder.rekey_to(target);
        }
        let txn = builder.build()?;

        tracing::info!(
            sender = %sender,
            receiver = %request.receiver,
            amount = request.amount,
            rekey_to = ?request.rekey_to.map(|a| a.to_string()),
            "Submitting payment"
        );
        self.sign_and_submit(operation, &txn, signer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_request_builder() {
        let receiver = Address::new([3; 32]);
        let target = Address::new([4; 32]);
        let request = PaymentRequest::new(receiver, 1_000)
            .note("hello")
            .lease([9; 32])
            .rekey_to(target);

        assert_eq!(request.note.as_deref(), Some(&b"hello"[..]));
        assert_eq!(request.lease, Some([9; 32]));
        assert_eq!(request.rekey_to, Some(target));
        assert_eq!(request.sender, None);
    }
}
