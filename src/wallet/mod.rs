//! Key material and addresses.
//!
//! # Data Flow
//! ```text
//! Environment variable / backup phrase
//!     → mnemonic.rs (25 words ↔ 32-byte seed)
//!     → account.rs (ed25519 key pair, raw signing)
//!     → address.rs (checksummed base32 text form)
//! Member addresses + threshold
//!     → multisig.rs (composite address)
//! ```
//!
//! # Security Constraints
//! - Secrets ONLY from backup phrases held in environment variables
//! - Never log private keys or phrases

pub mod account;
pub mod address;
pub mod mnemonic;
pub mod multisig;
pub mod types;

pub use account::Account;
pub use address::Address;
pub use multisig::{MultisigDescriptor, MULTISIG_VERSION};
pub use types::{WalletError, WalletResult};
