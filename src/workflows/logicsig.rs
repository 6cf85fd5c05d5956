//! Program compilation and logic-signature payments.

use crate::blockchain::{CompiledProgram, LedgerResult};
use crate::transaction::{LogicSigAccount, Payment};
use crate::wallet::{Account, Address};
use crate::workflows::{Confirmation, WorkflowRunner};

impl WorkflowRunner {
    /// Compile TEAL source on the node.
    pub async fn compile_program(&self, source: &str) -> LedgerResult<CompiledProgram> {
        self.run("compile_program", async {
            let program = self.algod().compile_program(source).await?;
            tracing::info!(
                hash = %program.hash,
                size = program.bytes.len(),
                "Program compiled"
            );
            Ok(program)
        })
        .await
    }

    /// Pay out of the escrow address derived from `program`.
    pub async fn escrow_payment(
        &self,
        program: &CompiledProgram,
        args: Vec<Vec<u8>>,
        receiver: Address,
        amount: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("escrow_payment", async {
            let escrow = LogicSigAccount::escrow(program.bytes.clone(), args);
            tracing::info!(escrow = %escrow.address(), "Paying from escrow");
            let txn = self.build(escrow.address(), Payment::new(receiver, amount)).await?;
            self.sign_and_submit("escrow_payment", &txn, &escrow).await
        })
        .await
    }

    /// Pay from `owner`'s account under a program `owner` delegated to.
    pub async fn delegated_payment(
        &self,
        program: &CompiledProgram,
        args: Vec<Vec<u8>>,
        owner: &Account,
        receiver: Address,
        amount: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("delegated_payment", async {
            let delegated = LogicSigAccount::delegated(program.bytes.clone(), args, owner);
            let txn = self
                .build(delegated.address(), Payment::new(receiver, amount))
                .await?;
            self.sign_and_submit("delegated_payment", &txn, &delegated).await
        })
        .await
    }
}
