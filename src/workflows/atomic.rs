//! Atomic groups of independent requests.

use std::sync::Arc;

use crate::abi::AtomicTransactionComposer;
use crate::blockchain::LedgerResult;
use crate::transaction::{TransactionKind, TransactionSigner, TxnBuilder};
use crate::workflows::{Confirmation, WorkflowRunner};

/// One request of an atomic group and who signs it.
#[derive(Clone)]
pub struct GroupMember {
    pub signer: Arc<dyn TransactionSigner>,
    pub kind: TransactionKind,
    pub note: Option<Vec<u8>>,
}

impl GroupMember {
    pub fn new(signer: Arc<dyn TransactionSigner>, kind: impl Into<TransactionKind>) -> Self {
        Self {
            signer,
            kind: kind.into(),
            note: None,
        }
    }
}

impl std::fmt::Debug for GroupMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupMember")
            .field("signer", &self.signer.address())
            .field("kind", &self.kind)
            .finish()
    }
}

impl WorkflowRunner {
    /// Submit `members` as one group: all are included or none.
    ///
    /// # Returns
    /// The confirmation of the first request; every member shares its round.
    pub async fn atomic_transfer(&self, members: Vec<GroupMember>) -> LedgerResult<Confirmation> {
        self.run("atomic_transfer", async {
            let params = self.params().await?;
            let mut composer = AtomicTransactionComposer::new();
            for member in members {
                let mut builder =
                    TxnBuilder::new(&params, member.signer.address(), member.kind);
                if let Some(note) = member.note {
                    builder = builder.note(note);
                }
                composer.add_transaction(builder.build()?, member.signer)?;
            }

            let size = composer.count();
            let signed = composer.gather_signatures()?;
            tracing::info!(size, "Submitting atomic group");
            self.submit("atomic_transfer", &signed).await
        })
        .await
    }
}
