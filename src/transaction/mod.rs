//! Transaction construction, encoding and signing.
//!
//! # Data Flow
//! ```text
//! SuggestedParams (from node) + business fields
//!     → builder.rs (TxnBuilder, fee estimation)
//!     → group.rs (optional shared group id)
//!     → signer.rs (Account | LogicSigAccount | MultisigSigner)
//!     → signed.rs (SignedTransaction, msgpack for submission)
//! ```
//!
//! # Design Decisions
//! - Requests are plain values; nothing here talks to the network
//! - Encoding is canonical msgpack (wire.rs) so ids match the ledger's
//! - Business rules (balances, thresholds, program logic) are left to the ledger

pub mod builder;
pub mod group;
pub mod logicsig;
pub mod signed;
pub mod signer;
pub mod types;
mod wire;

pub use builder::TxnBuilder;
pub use group::{assign_group_id, compute_group_id};
pub use logicsig::{LogicSig, LogicSigAccount};
pub use signed::{Authorization, MultisigSignature, SignedTransaction};
pub use signer::{MultisigSigner, TransactionSigner};
pub use types::{
    ApplicationCall, AssetConfig, AssetFreeze, AssetParams, AssetTransfer, Header, OnComplete,
    Payment, StateSchema, SuggestedParams, Transaction, TransactionError, TransactionKind,
    TransactionResult, MAX_GROUP_SIZE,
};
