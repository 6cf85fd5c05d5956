//! Example workflows over the ledger.
//!
//! # Data Flow
//! ```text
//! WorkflowRunner (node + indexer clients)
//!     → fetch suggested params
//!     → build request (transaction module)
//!     → sign (Account | MultisigSigner | LogicSigAccount)
//!     → submit, wait WAIT_ROUNDS for confirmation
//!     → Confirmation (round, created ids, logs)
//! ```
//!
//! # Design Decisions
//! - One template (`submit`) shared by every submitting operation
//! - Each run gets its own span with a run ID
//! - Errors are logged and returned unchanged; nothing retries
//! - Business rules (balances, roles, thresholds) are left to the ledger

pub mod abi;
pub mod accounts;
pub mod applications;
pub mod assets;
pub mod atomic;
pub mod history;
pub mod logicsig;
pub mod multisig;
pub mod payments;
pub mod programs;
pub mod state;

use std::future::Future;

use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{
    AlgodClient, IndexerClient, LedgerError, LedgerResult, NetworkConfig, PendingTransaction,
    WAIT_ROUNDS,
};
use crate::observability::metrics;
use crate::transaction::{
    SignedTransaction, SuggestedParams, Transaction, TransactionKind, TransactionSigner, TxnBuilder,
};
use crate::wallet::Address;

pub use accounts::{generate_account, recover_account};
pub use applications::ApplicationSpec;
pub use assets::AssetRoles;
pub use atomic::GroupMember;
pub use multisig::multisig_address;
pub use payments::PaymentRequest;

/// The ledger's record of an included request.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub tx_id: String,
    pub confirmed_round: u64,
    pub record: PendingTransaction,
}

impl Confirmation {
    fn new(tx_id: String, record: PendingTransaction) -> Self {
        Self {
            tx_id,
            confirmed_round: record.confirmed_round.unwrap_or_default(),
            record,
        }
    }

    /// Id of the asset created by this request.
    pub fn asset_id(&self) -> Option<u64> {
        self.record.asset_index
    }

    /// Id of the application created by this request.
    pub fn application_id(&self) -> Option<u64> {
        self.record.application_index
    }
}

/// Runs the request/sign/submit/confirm template for every operation.
#[derive(Debug, Clone)]
pub struct WorkflowRunner {
    algod: AlgodClient,
    indexer: Option<IndexerClient>,
}

impl WorkflowRunner {
    /// Create a runner with node and indexer clients for `config`.
    pub fn new(config: &NetworkConfig) -> LedgerResult<Self> {
        Ok(Self {
            algod: AlgodClient::new(config)?,
            indexer: Some(IndexerClient::new(config)?),
        })
    }

    pub fn with_clients(algod: AlgodClient, indexer: Option<IndexerClient>) -> Self {
        Self { algod, indexer }
    }

    pub fn algod(&self) -> &AlgodClient {
        &self.algod
    }

    pub(crate) fn indexer(&self) -> LedgerResult<&IndexerClient> {
        self.indexer
            .as_ref()
            .ok_or_else(|| LedgerError::InvalidEndpoint("no indexer configured".to_string()))
    }

    /// Run `work` inside a span named after `operation`, logging the outcome.
    pub(crate) async fn run<T, F>(&self, operation: &'static str, work: F) -> LedgerResult<T>
    where
        F: Future<Output = LedgerResult<T>>,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", operation, run_id = %run_id);

        async move {
            tracing::debug!("Workflow started");
            let result = work.await;
            match &result {
                Ok(_) => tracing::info!("Workflow completed"),
                Err(e) => {
                    metrics::record_failure(operation);
                    tracing::error!(error = %e, rejected = e.is_rejection(), "Workflow failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    pub(crate) async fn params(&self) -> LedgerResult<SuggestedParams> {
        self.algod.suggested_params().await
    }

    /// Build a request from fresh params for `sender`.
    pub(crate) async fn build(
        &self,
        sender: Address,
        kind: impl Into<TransactionKind>,
    ) -> LedgerResult<Transaction> {
        let params = self.params().await?;
        Ok(TxnBuilder::new(&params, sender, kind).build()?)
    }

    /// Sign `txn`, submit it and wait for confirmation.
    pub(crate) async fn sign_and_submit(
        &self,
        operation: &'static str,
        txn: &Transaction,
        signer: &dyn TransactionSigner,
    ) -> LedgerResult<Confirmation> {
        let signed = signer.sign(txn)?;
        self.submit(operation, std::slice::from_ref(&signed)).await
    }

    /// Submit already-signed requests and wait for the first to confirm.
    pub(crate) async fn submit(
        &self,
        operation: &'static str,
        signed: &[SignedTransaction],
    ) -> LedgerResult<Confirmation> {
        let tx_id = self.algod.send_transactions(signed).await?;
        metrics::record_submission(operation);

        let record = self.algod.wait_for_confirmation(&tx_id, WAIT_ROUNDS).await?;
        let confirmation = Confirmation::new(tx_id, record);
        tracing::info!(
            tx_id = %confirmation.tx_id,
            confirmed_round = confirmation.confirmed_round,
            "Request confirmed"
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> NetworkConfig {
        NetworkConfig {
            algod_url: "http://127.0.0.1:1".to_string(),
            indexer_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 1,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_confirmation_exposes_created_ids() {
        let record = PendingTransaction {
            confirmed_round: Some(12),
            asset_index: Some(77),
            ..PendingTransaction::default()
        };
        let confirmation = Confirmation::new("TXID".to_string(), record);
        assert_eq!(confirmation.confirmed_round, 12);
        assert_eq!(confirmation.asset_id(), Some(77));
        assert_eq!(confirmation.application_id(), None);
    }

    #[test]
    fn test_missing_indexer() {
        let runner = WorkflowRunner::with_clients(AlgodClient::new(&offline_config()).unwrap(), None);
        assert!(matches!(
            runner.indexer(),
            Err(LedgerError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_run_returns_error_unchanged() {
        let runner = WorkflowRunner::new(&offline_config()).unwrap();
        let err = runner
            .run("test", async { Err::<(), _>(LedgerError::Rejected("overspend".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(ref msg) if msg == "overspend"));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let runner = WorkflowRunner::new(&offline_config()).unwrap();
        let err = runner.params().await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }
}
