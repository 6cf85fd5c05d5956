//! Indexer REST client for historical queries.

use crate::blockchain::http::RestClient;
use crate::blockchain::models::{AssetBalancesPage, HealthCheck, TransactionsPage};
use crate::blockchain::types::{LedgerResult, NetworkConfig};
use crate::encoding::base64_encode;
use crate::wallet::Address;

pub const INDEXER_TOKEN_HEADER: &str = "X-Indexer-API-Token";

/// Client for the indexing/query API.
#[derive(Clone, Debug)]
pub struct IndexerClient {
    rest: RestClient,
}

impl IndexerClient {
    pub fn new(config: &NetworkConfig) -> LedgerResult<Self> {
        let rest = RestClient::new(
            &config.indexer_url,
            INDEXER_TOKEN_HEADER,
            &config.indexer_token,
            config.request_timeout_secs,
        )?;
        tracing::info!(indexer_url = %rest.base_url(), "Indexer client initialized");
        Ok(Self { rest })
    }

    pub async fn health(&self) -> LedgerResult<HealthCheck> {
        self.rest.get_json("/health", &[]).await
    }

    /// Most recent transactions involving `address`.
    pub async fn account_transactions(
        &self,
        address: &Address,
        limit: u64,
    ) -> LedgerResult<TransactionsPage> {
        self.rest
            .get_json(
                &format!("/v2/accounts/{}/transactions", address),
                &[("limit", limit.to_string())],
            )
            .await
    }

    /// Transactions whose note starts with `prefix`.
    pub async fn search_transactions_by_note_prefix(
        &self,
        prefix: &[u8],
        min_round: Option<u64>,
    ) -> LedgerResult<TransactionsPage> {
        let mut query = vec![("note-prefix", base64_encode(prefix))];
        if let Some(round) = min_round {
            query.push(("min-round", round.to_string()));
        }
        self.rest.get_json("/v2/transactions", &query).await
    }

    /// Holders of `asset_id` and their balances.
    pub async fn asset_balances(&self, asset_id: u64) -> LedgerResult<AssetBalancesPage> {
        self.rest
            .get_json(&format!("/v2/assets/{}/balances", asset_id), &[])
            .await
    }
}
