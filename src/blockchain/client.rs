//! Node REST client with confirmation polling.
//!
//! # Responsibilities
//! - Connect to the transaction-submission API
//! - Fetch network parameters, node status and ledger state
//! - Submit signed requests as msgpack
//! - Wait a bounded number of rounds for inclusion

use std::time::Instant;

use crate::blockchain::http::RestClient;
use crate::blockchain::models::{
    AccountInformation, Application, Asset, CompileResponse, CompiledProgram, NodeStatus,
    PendingTransaction, PostTransactionsResponse, TransactionParams,
};
use crate::blockchain::types::{LedgerError, LedgerResult, NetworkConfig};
use crate::observability::metrics;
use crate::transaction::{SignedTransaction, SuggestedParams, TransactionError};
use crate::wallet::Address;

/// Header carrying the node API token.
pub const ALGOD_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Client for the node's transaction-submission API.
#[derive(Clone, Debug)]
pub struct AlgodClient {
    rest: RestClient,
}

impl AlgodClient {
    /// Create a client for the configured node endpoint.
    pub fn new(config: &NetworkConfig) -> LedgerResult<Self> {
        let rest = RestClient::new(
            &config.algod_url,
            ALGOD_TOKEN_HEADER,
            &config.algod_token,
            config.request_timeout_secs,
        )?;
        tracing::info!(algod_url = %rest.base_url(), "Node client initialized");
        Ok(Self { rest })
    }

    pub fn endpoint(&self) -> &str {
        self.rest.base_url()
    }

    pub async fn status(&self) -> LedgerResult<NodeStatus> {
        self.rest.get_json("/v2/status", &[]).await
    }

    /// Block until the node has seen a round after `round`.
    pub async fn status_after_block(&self, round: u64) -> LedgerResult<NodeStatus> {
        self.rest
            .get_json(&format!("/v2/status/wait-for-block-after/{}", round), &[])
            .await
    }

    /// Fetch the parameters every new request is built from.
    pub async fn suggested_params(&self) -> LedgerResult<SuggestedParams> {
        let params: TransactionParams = self.rest.get_json("/v2/transactions/params", &[]).await?;
        tracing::debug!(
            last_round = params.last_round,
            min_fee = params.min_fee,
            genesis_id = %params.genesis_id,
            "Fetched suggested params"
        );
        params.into_suggested()
    }

    /// Submit one request or a whole group; returns the id of the first.
    pub async fn send_transactions(&self, signed: &[SignedTransaction]) -> LedgerResult<String> {
        if signed.is_empty() {
            return Err(TransactionError::EmptyGroup.into());
        }

        let mut body = Vec::new();
        for txn in signed {
            body.extend_from_slice(&txn.encode()?);
        }

        let response: PostTransactionsResponse = self
            .rest
            .post_json("/v2/transactions", "application/x-binary", body)
            .await?;
        tracing::info!(tx_id = %response.tx_id, count = signed.len(), "Transaction submitted");
        Ok(response.tx_id)
    }

    pub async fn send_transaction(&self, signed: &SignedTransaction) -> LedgerResult<String> {
        self.send_transactions(std::slice::from_ref(signed)).await
    }

    pub async fn pending_transaction(&self, tx_id: &str) -> LedgerResult<PendingTransaction> {
        self.rest
            .get_json(
                &format!("/v2/transactions/pending/{}", tx_id),
                &[("format", "json".to_string())],
            )
            .await
    }

    /// Wait up to `wait_rounds` rounds for `tx_id` to be confirmed.
    ///
    /// # Returns
    /// The confirmation record, `Rejected` if the pool dropped the request,
    /// or `ConfirmationTimeout` once the budget is spent.
    pub async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        wait_rounds: u64,
    ) -> LedgerResult<PendingTransaction> {
        let started = Instant::now();
        let last_round = self.status().await?.last_round;
        let start_round = last_round + 1;
        let mut current_round = start_round;

        while current_round < start_round + wait_rounds {
            match self.pending_transaction(tx_id).await {
                Ok(pending) if pending.is_confirmed() => {
                    metrics::record_confirmation(started.elapsed());
                    tracing::info!(
                        tx_id = %tx_id,
                        confirmed_round = pending.confirmed_round.unwrap_or_default(),
                        "Transaction confirmed"
                    );
                    return Ok(pending);
                }
                Ok(pending) if !pending.pool_error.is_empty() => {
                    return Err(LedgerError::Rejected(pending.pool_error));
                }
                Ok(_) => {
                    tracing::debug!(tx_id = %tx_id, round = current_round, "Transaction pending");
                }
                // Not yet visible to this node.
                Err(LedgerError::Api { status: 404, .. }) => {
                    tracing::debug!(tx_id = %tx_id, round = current_round, "Transaction not found yet");
                }
                Err(e) => return Err(e),
            }

            self.status_after_block(current_round).await?;
            current_round += 1;
        }

        Err(LedgerError::ConfirmationTimeout(wait_rounds))
    }

    pub async fn account_information(&self, address: &Address) -> LedgerResult<AccountInformation> {
        self.rest
            .get_json(&format!("/v2/accounts/{}", address), &[])
            .await
    }

    pub async fn asset_information(&self, asset_id: u64) -> LedgerResult<Asset> {
        self.rest.get_json(&format!("/v2/assets/{}", asset_id), &[]).await
    }

    pub async fn application_information(&self, app_id: u64) -> LedgerResult<Application> {
        self.rest
            .get_json(&format!("/v2/applications/{}", app_id), &[])
            .await
    }

    /// Compile TEAL source on the node.
    pub async fn compile_program(&self, source: &str) -> LedgerResult<CompiledProgram> {
        let response: CompileResponse = self
            .rest
            .post_json("/v2/teal/compile", "text/plain", source.as_bytes().to_vec())
            .await?;
        tracing::info!(hash = %response.hash, "Program compiled");
        response.try_into()
    }

    /// Check if the node is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.status().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            algod_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 1,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = AlgodClient::new(&test_config()).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let client = AlgodClient::new(&test_config()).unwrap();
        assert!(!client.is_healthy().await);
        let err = client.status().await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_submission_rejected_locally() {
        let client = AlgodClient::new(&test_config()).unwrap();
        let err = client.send_transactions(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transaction(TransactionError::EmptyGroup)
        ));
    }
}
