//! Indexer-backed lookups of past activity.

use crate::blockchain::models::{AssetBalancesPage, TransactionsPage};
use crate::blockchain::LedgerResult;
use crate::wallet::Address;
use crate::workflows::WorkflowRunner;

impl WorkflowRunner {
    pub async fn transaction_history(
        &self,
        address: &Address,
        limit: u64,
    ) -> LedgerResult<TransactionsPage> {
        self.run("transaction_history", async {
            let page = self.indexer()?.account_transactions(address, limit).await?;
            for txn in &page.transactions {
                tracing::info!(
                    tx_id = %txn.id,
                    tx_type = %txn.tx_type,
                    round = ?txn.confirmed_round,
                    "Transaction"
                );
            }
            Ok(page)
        })
        .await
    }

    /// Transactions whose note starts with `prefix`, from `min_round` on.
    pub async fn find_by_note(
        &self,
        prefix: &[u8],
        min_round: Option<u64>,
    ) -> LedgerResult<TransactionsPage> {
        self.run("find_by_note", async {
            let page = self
                .indexer()?
                .search_transactions_by_note_prefix(prefix, min_round)
                .await?;
            tracing::info!(matches = page.transactions.len(), "Note search finished");
            Ok(page)
        })
        .await
    }

    pub async fn asset_holders(&self, asset_id: u64) -> LedgerResult<AssetBalancesPage> {
        self.run("asset_holders", async {
            let page = self.indexer()?.asset_balances(asset_id).await?;
            tracing::info!(asset_id, holders = page.balances.len(), "Asset holders");
            Ok(page)
        })
        .await
    }
}
