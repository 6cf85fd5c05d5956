//! Atomic transaction composer.
//!
//! Collects plain transactions and method calls together with their
//! signers, turns them into one group, and decodes a return value for every
//! method call once the group is confirmed.

use std::fmt;
use std::sync::Arc;

use crate::abi::method::Method;
use crate::abi::types::{AbiError, AbiValue};
use crate::blockchain::{AlgodClient, LedgerResult};
use crate::transaction::{
    assign_group_id, ApplicationCall, OnComplete, SignedTransaction, SuggestedParams, Transaction,
    TransactionError, TransactionSigner, TxnBuilder, MAX_GROUP_SIZE,
};
use crate::wallet::Address;

/// Lifecycle of a composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerStatus {
    Building,
    Built,
    Signed,
    Submitted,
    Committed,
}

#[derive(Clone)]
pub struct TransactionWithSigner {
    pub txn: Transaction,
    pub signer: Arc<dyn TransactionSigner>,
}

impl fmt::Debug for TransactionWithSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionWithSigner")
            .field("txn", &self.txn)
            .field("signer", &self.signer.address())
            .finish()
    }
}

/// Everything needed to turn a method invocation into an application call.
#[derive(Clone)]
pub struct MethodCallParams {
    pub app_id: u64,
    pub method: Method,
    /// Values for every argument that is not transaction-typed.
    pub args: Vec<AbiValue>,
    /// Transaction-typed arguments, placed in the group right before the call.
    pub transactions: Vec<TransactionWithSigner>,
    pub sender: Address,
    pub signer: Arc<dyn TransactionSigner>,
    pub params: SuggestedParams,
    pub on_complete: OnComplete,
    pub note: Option<Vec<u8>>,
}

impl MethodCallParams {
    pub fn new(
        app_id: u64,
        method: Method,
        args: Vec<AbiValue>,
        signer: Arc<dyn TransactionSigner>,
        params: SuggestedParams,
    ) -> Self {
        Self {
            app_id,
            method,
            args,
            transactions: Vec::new(),
            sender: signer.address(),
            signer,
            params,
            on_complete: OnComplete::NoOp,
            note: None,
        }
    }

    /// Supply the next transaction-typed argument.
    pub fn transaction_arg(mut self, txn: Transaction, signer: Arc<dyn TransactionSigner>) -> Self {
        self.transactions.push(TransactionWithSigner { txn, signer });
        self
    }
}

/// Outcome of one method call in an executed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiResult {
    pub tx_id: String,
    pub method: Method,
    /// Return bytes with the log prefix removed; empty for `void`.
    pub raw_return: Vec<u8>,
    pub return_value: Option<AbiValue>,
    pub confirmed_round: u64,
}

#[derive(Debug, Clone)]
pub struct ExecuteResult {
    pub confirmed_round: u64,
    pub tx_ids: Vec<String>,
    pub method_results: Vec<AbiResult>,
}

pub struct AtomicTransactionComposer {
    status: ComposerStatus,
    entries: Vec<TransactionWithSigner>,
    /// Group position and method of every method call.
    methods: Vec<(usize, Method)>,
    signed: Vec<SignedTransaction>,
    tx_ids: Vec<String>,
}

impl Default for AtomicTransactionComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicTransactionComposer {
    pub fn new() -> Self {
        Self {
            status: ComposerStatus::Building,
            entries: Vec::new(),
            methods: Vec::new(),
            signed: Vec::new(),
            tx_ids: Vec::new(),
        }
    }

    pub fn status(&self) -> ComposerStatus {
        self.status
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    fn ensure_room(&self, adding: usize) -> LedgerResult<()> {
        if self.status != ComposerStatus::Building {
            return Err(AbiError::ComposerLocked.into());
        }
        if self.entries.len() + adding > MAX_GROUP_SIZE {
            return Err(TransactionError::GroupTooLarge(self.entries.len() + adding).into());
        }
        Ok(())
    }

    pub fn add_transaction(
        &mut self,
        txn: Transaction,
        signer: Arc<dyn TransactionSigner>,
    ) -> LedgerResult<()> {
        self.ensure_room(1)?;
        self.entries.push(TransactionWithSigner { txn, signer });
        Ok(())
    }

    /// Add a method call as an application call transaction, preceded by
    /// its transaction-typed arguments.
    pub fn add_method_call(&mut self, call: MethodCallParams) -> LedgerResult<()> {
        let expected = call.method.transaction_args();
        if expected.len() != call.transactions.len() {
            return Err(AbiError::ArgumentCount {
                method: call.method.signature(),
                expected: expected.len(),
                found: call.transactions.len(),
            }
            .into());
        }
        for (arg, supplied) in expected.iter().zip(&call.transactions) {
            let tag = supplied.txn.kind.type_tag();
            if !arg.accepts(tag) {
                return Err(AbiError::TypeMismatch {
                    expected: arg.tag().to_string(),
                    found: format!("{} transaction", tag),
                }
                .into());
            }
        }
        self.ensure_room(call.transactions.len() + 1)?;

        let app_call = call.method.apply_arguments(
            ApplicationCall::with_on_complete(call.app_id, call.on_complete),
            call.sender,
            &call.args,
        )?;
        let mut builder = TxnBuilder::new(&call.params, call.sender, app_call);
        if let Some(note) = call.note {
            builder = builder.note(note);
        }
        let txn = builder.build()?;

        tracing::debug!(
            method = %call.method,
            app_id = call.app_id,
            position = self.entries.len(),
            "Method call added"
        );
        self.entries.extend(call.transactions);
        self.methods.push((self.entries.len(), call.method));
        self.entries.push(TransactionWithSigner {
            txn,
            signer: call.signer,
        });
        Ok(())
    }

    /// Finalize the group. A shared group id is only assigned when there
    /// is more than one transaction.
    pub fn build_group(&mut self) -> LedgerResult<Vec<TransactionWithSigner>> {
        if self.status == ComposerStatus::Building {
            if self.entries.is_empty() {
                return Err(TransactionError::EmptyGroup.into());
            }
            if self.entries.len() > 1 {
                let mut txns: Vec<Transaction> =
                    self.entries.iter().map(|entry| entry.txn.clone()).collect();
                assign_group_id(&mut txns)?;
                for (entry, txn) in self.entries.iter_mut().zip(txns) {
                    entry.txn = txn;
                }
            }
            self.status = ComposerStatus::Built;
        }
        Ok(self.entries.clone())
    }

    /// Sign every transaction with its own signer.
    pub fn gather_signatures(&mut self) -> LedgerResult<Vec<SignedTransaction>> {
        if self.status == ComposerStatus::Building || self.status == ComposerStatus::Built {
            let entries = self.build_group()?;
            self.signed = entries
                .iter()
                .map(|entry| entry.signer.sign(&entry.txn))
                .collect::<Result<Vec<_>, _>>()?;
            self.status = ComposerStatus::Signed;
        }
        Ok(self.signed.clone())
    }

    /// Sign and send the group, returning the ids of its members.
    pub async fn submit(&mut self, client: &AlgodClient) -> LedgerResult<Vec<String>> {
        if self.status == ComposerStatus::Submitted || self.status == ComposerStatus::Committed {
            return Err(AbiError::ComposerLocked.into());
        }

        let signed = self.gather_signatures()?;
        let tx_ids = signed
            .iter()
            .map(SignedTransaction::id)
            .collect::<Result<Vec<_>, _>>()?;

        client.send_transactions(&signed).await?;
        self.status = ComposerStatus::Submitted;
        self.tx_ids = tx_ids.clone();
        Ok(tx_ids)
    }

    /// Wait up to `wait_rounds` for a submitted group and decode method results.
    pub async fn wait_for_results(
        &mut self,
        client: &AlgodClient,
        wait_rounds: u64,
    ) -> LedgerResult<ExecuteResult> {
        if self.status != ComposerStatus::Submitted {
            return Err(AbiError::ComposerLocked.into());
        }
        let tx_ids = self.tx_ids.clone();
        let first_id = tx_ids.first().ok_or(TransactionError::EmptyGroup)?;

        let first = client.wait_for_confirmation(first_id, wait_rounds).await?;
        let confirmed_round = first.confirmed_round.unwrap_or_default();
        self.status = ComposerStatus::Committed;

        let mut method_results = Vec::with_capacity(self.methods.len());
        for (index, method) in &self.methods {
            let record = if *index == 0 {
                first.clone()
            } else {
                client.pending_transaction(&tx_ids[*index]).await?
            };
            let logs = record.decoded_logs()?;
            let (raw_return, return_value) = method.decode_return(&logs)?;
            tracing::info!(
                method = %method,
                tx_id = %tx_ids[*index],
                return_value = ?return_value,
                "Method call confirmed"
            );
            method_results.push(AbiResult {
                tx_id: tx_ids[*index].clone(),
                method: method.clone(),
                raw_return,
                return_value,
                confirmed_round,
            });
        }

        Ok(ExecuteResult {
            confirmed_round,
            tx_ids,
            method_results,
        })
    }

    /// Submit the group, wait up to `wait_rounds` and decode method results.
    pub async fn execute(
        &mut self,
        client: &AlgodClient,
        wait_rounds: u64,
    ) -> LedgerResult<ExecuteResult> {
        self.submit(client).await?;
        self.wait_for_results(client, wait_rounds).await
    }
}
