//! Wallet error definitions.

use thiserror::Error;

/// Errors raised while handling keys, phrases and addresses.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Address text is malformed or fails its checksum.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Backup phrase cannot be decoded.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Multisig descriptor parameters are inconsistent.
    #[error("Invalid multisig descriptor: {0}")]
    InvalidMultisig(String),

    /// Secret material was expected in the environment.
    #[error("Environment variable {0} not set")]
    MissingEnv(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
