//! Response bodies of the node and indexer REST APIs.

use serde::{Deserialize, Serialize};

use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::encoding::base64_decode;
use crate::transaction::SuggestedParams;

/// Validity window length applied to fetched parameters.
pub const VALIDITY_WINDOW: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionParams {
    pub consensus_version: String,
    pub fee: u64,
    pub genesis_hash: String,
    pub genesis_id: String,
    pub last_round: u64,
    pub min_fee: u64,
}

impl TransactionParams {
    /// Convert into builder parameters valid for the next 1000 rounds.
    pub fn into_suggested(self) -> LedgerResult<SuggestedParams> {
        let hash = base64_decode(&self.genesis_hash)
            .filter(|bytes| bytes.len() == 32)
            .ok_or_else(|| LedgerError::Decode("genesis hash is not 32 bytes".to_string()))?;
        let mut genesis_hash = [0u8; 32];
        genesis_hash.copy_from_slice(&hash);

        Ok(SuggestedParams {
            fee: self.fee,
            min_fee: self.min_fee,
            flat_fee: false,
            first_valid: self.last_round,
            last_valid: self.last_round + VALIDITY_WINDOW,
            genesis_id: self.genesis_id,
            genesis_hash,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
    #[serde(default)]
    pub time_since_last_round: u64,
    #[serde(default)]
    pub catchup_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// Pending-pool record; once `confirmed_round` is set it is the
/// confirmation record of the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransaction {
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
    #[serde(default)]
    pub asset_index: Option<u64>,
    #[serde(default)]
    pub application_index: Option<u64>,
    #[serde(default)]
    pub close_rewards: Option<u64>,
    #[serde(default)]
    pub closing_amount: Option<u64>,
    /// Base64-encoded application log entries.
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub txn: serde_json::Value,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.unwrap_or(0) > 0
    }

    pub fn decoded_logs(&self) -> LedgerResult<Vec<Vec<u8>>> {
        self.logs
            .iter()
            .map(|entry| {
                base64_decode(entry)
                    .ok_or_else(|| LedgerError::Decode(format!("log entry '{}' is not base64", entry)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TealValue {
    /// 1 for byte strings, otherwise an unsigned integer.
    #[serde(rename = "type")]
    pub kind: u64,
    #[serde(default)]
    pub bytes: String,
    #[serde(default)]
    pub uint: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TealKeyValue {
    /// Base64-encoded key.
    pub key: String,
    pub value: TealValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetHolding {
    pub asset_id: u64,
    pub amount: u64,
    #[serde(default)]
    pub is_frozen: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationLocalState {
    pub id: u64,
    #[serde(default)]
    pub key_value: Vec<TealKeyValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountInformation {
    pub address: String,
    pub amount: u64,
    #[serde(default)]
    pub min_balance: u64,
    #[serde(default)]
    pub auth_addr: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetHolding>,
    #[serde(default)]
    pub created_assets: Vec<Asset>,
    #[serde(default)]
    pub apps_local_state: Vec<ApplicationLocalState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetParamsResponse {
    pub creator: String,
    pub total: u64,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub default_frozen: bool,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub reserve: Option<String>,
    #[serde(default)]
    pub freeze: Option<String>,
    #[serde(default)]
    pub clawback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub index: u64,
    pub params: AssetParamsResponse,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationParams {
    pub creator: String,
    #[serde(default)]
    pub approval_program: String,
    #[serde(default)]
    pub clear_state_program: String,
    #[serde(default)]
    pub global_state: Vec<TealKeyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: u64,
    pub params: ApplicationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompileResponse {
    /// Address of the program when used as an escrow.
    pub hash: String,
    /// Base64-encoded program bytes.
    pub result: String,
}

/// Program bytes returned by the compile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    pub bytes: Vec<u8>,
    pub hash: String,
}

impl TryFrom<CompileResponse> for CompiledProgram {
    type Error = LedgerError;

    fn try_from(value: CompileResponse) -> Result<Self, Self::Error> {
        let bytes = base64_decode(&value.result)
            .ok_or_else(|| LedgerError::Decode("compiled program is not base64".to_string()))?;
        Ok(Self {
            bytes,
            hash: value.hash,
        })
    }
}

// Indexer

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HealthCheck {
    pub round: u64,
    #[serde(default)]
    pub db_available: bool,
    #[serde(default)]
    pub is_migrating: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexedTransaction {
    pub id: String,
    pub sender: String,
    pub tx_type: String,
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub fee: u64,
    /// Base64-encoded note.
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionsPage {
    pub current_round: u64,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub transactions: Vec<IndexedTransaction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MiniAssetHolding {
    pub address: String,
    pub amount: u64,
    #[serde(default)]
    pub is_frozen: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetBalancesPage {
    pub current_round: u64,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub balances: Vec<MiniAssetHolding>,
}
