//! Multisig address derivation and payments.

use crate::blockchain::LedgerResult;
use crate::transaction::{MultisigSigner, Payment};
use crate::wallet::{Address, MultisigDescriptor, WalletResult, MULTISIG_VERSION};
use crate::workflows::{Confirmation, WorkflowRunner};

/// Derive the composite address for `members` (order matters) and `threshold`.
///
/// No network access.
pub fn multisig_address(threshold: u8, members: Vec<Address>) -> WalletResult<MultisigDescriptor> {
    let descriptor = MultisigDescriptor::new(MULTISIG_VERSION, threshold, members)?;
    tracing::info!(
        address = %descriptor.address(),
        threshold,
        members = descriptor.members().len(),
        "Multisig address derived"
    );
    Ok(descriptor)
}

impl WorkflowRunner {
    /// Pay from a multisig address, signed by every locally held member.
    ///
    /// Whether enough members signed is for the ledger to decide.
    pub async fn multisig_payment(
        &self,
        signer: &MultisigSigner,
        receiver: Address,
        amount: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("multisig_payment", async {
            let sender = signer.descriptor().address();
            let txn = self.build(sender, Payment::new(receiver, amount)).await?;
            self.sign_and_submit("multisig_payment", &txn, signer).await
        })
        .await
    }
}
