//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default, so an absent file means the public test
//! network with empty tokens.

use serde::{Deserialize, Serialize};

/// Root configuration for the workflow runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Node and indexer endpoints.
    pub network: NetworkConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Ledger endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Transaction-submission API base URL.
    pub algod_url: String,

    /// Node API token; empty for public endpoints.
    pub algod_token: String,

    /// Indexing/query API base URL.
    pub indexer_url: String,

    pub indexer_token: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            algod_url: "https://testnet-api.algonode.cloud".to_string(),
            algod_token: String::new(),
            indexer_url: "https://testnet-idx.algonode.cloud".to_string(),
            indexer_token: String::new(),
            request_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
