//! Global and per-account application state reads.

use std::collections::BTreeMap;

use crate::blockchain::{decode_state, LedgerResult, StateValue};
use crate::wallet::Address;
use crate::workflows::WorkflowRunner;

impl WorkflowRunner {
    pub async fn read_global_state(&self, app_id: u64) -> LedgerResult<BTreeMap<String, StateValue>> {
        self.run("read_global_state", async {
            let app = self.algod().application_information(app_id).await?;
            let state = decode_state(&app.params.global_state);
            for (key, value) in &state {
                tracing::info!(app_id, key = %key, value = %value, "Global state");
            }
            Ok(state)
        })
        .await
    }

    /// `account`'s local state in `app_id`; empty when not opted in.
    pub async fn read_local_state(
        &self,
        account: &Address,
        app_id: u64,
    ) -> LedgerResult<BTreeMap<String, StateValue>> {
        self.run("read_local_state", async {
            let info = self.algod().account_information(account).await?;
            let Some(local) = info.apps_local_state.iter().find(|local| local.id == app_id) else {
                tracing::info!(address = %account, app_id, "Account not opted in");
                return Ok(BTreeMap::new());
            };
            let state = decode_state(&local.key_value);
            for (key, value) in &state {
                tracing::info!(address = %account, app_id, key = %key, value = %value, "Local state");
            }
            Ok(state)
        })
        .await
    }
}
