//! Typed method calls through the atomic composer.

use std::sync::Arc;

use crate::abi::{
    AbiResult, AbiValue, AtomicTransactionComposer, Method, MethodCallParams,
    TransactionWithSigner,
};
use crate::blockchain::{LedgerError, LedgerResult, WAIT_ROUNDS};
use crate::observability::metrics;
use crate::transaction::TransactionSigner;
use crate::workflows::WorkflowRunner;

impl WorkflowRunner {
    /// Call `signature` (e.g. `add(uint64,uint64)uint64`) on `app_id`.
    pub async fn call_method(
        &self,
        signer: Arc<dyn TransactionSigner>,
        app_id: u64,
        signature: &str,
        args: Vec<AbiValue>,
    ) -> LedgerResult<AbiResult> {
        self.call_method_with_transactions(signer, app_id, signature, args, Vec::new())
            .await
    }

    /// Call a method that takes transaction arguments (`pay`, `axfer`, `txn`, ...).
    ///
    /// `transactions` fill the transaction-typed arguments in order and are
    /// grouped right before the application call; `args` fill the rest.
    pub async fn call_method_with_transactions(
        &self,
        signer: Arc<dyn TransactionSigner>,
        app_id: u64,
        signature: &str,
        args: Vec<AbiValue>,
        transactions: Vec<TransactionWithSigner>,
    ) -> LedgerResult<AbiResult> {
        self.run("call_method", async {
            let method: Method = signature.parse()?;
            let params = self.params().await?;

            let mut call = MethodCallParams::new(app_id, method, args, signer, params);
            call.transactions = transactions;
            let mut composer = AtomicTransactionComposer::new();
            composer.add_method_call(call)?;

            composer.submit(self.algod()).await?;
            metrics::record_submission("call_method");
            let result = composer.wait_for_results(self.algod(), WAIT_ROUNDS).await?;

            let abi_result = result.method_results.into_iter().next().ok_or_else(|| {
                LedgerError::Decode("group returned no method result".to_string())
            })?;
            tracing::info!(
                method = %abi_result.method,
                tx_id = %abi_result.tx_id,
                return_value = ?abi_result.return_value.as_ref().map(ToString::to_string),
                "Method returned"
            );
            Ok(abi_result)
        })
        .await
    }
}
