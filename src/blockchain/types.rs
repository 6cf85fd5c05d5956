//! Network error definitions and the confirmation budget.

use thiserror::Error;

use crate::abi::AbiError;
use crate::transaction::TransactionError;
use crate::wallet::WalletError;

// Re-export NetworkConfig from config module
pub use crate::config::schema::NetworkConfig;

/// Rounds every workflow waits for inclusion before giving up.
pub const WAIT_ROUNDS: u64 = 5;

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Connection, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with an error status.
    #[error("Node returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The transaction pool rejected the request after submission.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Transaction was not confirmed within the round budget.
    #[error("Transaction not confirmed after {0} rounds")]
    ConfirmationTimeout(u64),

    /// A response could not be interpreted.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Endpoint configuration is unusable.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

impl LedgerError {
    /// True when the ledger itself refused the request.
    pub fn is_rejection(&self) -> bool {
        match self {
            LedgerError::Rejected(_) => true,
            LedgerError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NetworkConfig::default();
        assert_eq!(config.algod_token, "");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.algod_url.starts_with("https://"));
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::ConfirmationTimeout(WAIT_ROUNDS);
        assert_eq!(err.to_string(), "Transaction not confirmed after 5 rounds");

        let err = LedgerError::Api {
            status: 400,
            message: "overspend".to_string(),
        };
        assert!(err.to_string().contains("overspend"));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_rejection_classification() {
        assert!(LedgerError::Rejected("logic eval error".to_string()).is_rejection());
        assert!(!LedgerError::ConfirmationTimeout(5).is_rejection());
        assert!(!LedgerError::Api {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_rejection());
    }
}
