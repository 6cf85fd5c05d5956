//! Example ledger workflows: accounts, multisig, payments, assets, atomic
//! groups, logic-signatures, applications, state reads and ABI calls.

pub mod abi;
pub mod blockchain;
pub mod config;
pub mod encoding;
pub mod observability;
pub mod transaction;
pub mod wallet;
pub mod workflows;

pub use blockchain::{AlgodClient, IndexerClient, LedgerError, LedgerResult};
pub use config::WorkflowConfig;
pub use workflows::{Confirmation, WorkflowRunner};
