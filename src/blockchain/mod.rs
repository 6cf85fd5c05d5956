//! Ledger network integration.
//!
//! # Data Flow
//! ```text
//! NetworkConfig (endpoints, empty tokens)
//!     → http.rs (REST plumbing, error bodies)
//!     → client.rs (params, submit, confirm, state reads, compile)
//!     → indexer.rs (historical queries)
//!     → state.rs (key/value state decoding)
//! ```
//!
//! # Design Decisions
//! - Every call has the configured request timeout
//! - Confirmation waits a fixed round budget (`WAIT_ROUNDS`)
//! - Errors are returned unchanged; nothing here retries

pub mod client;
mod http;
pub mod indexer;
pub mod models;
pub mod state;
pub mod types;

pub use client::AlgodClient;
pub use indexer::IndexerClient;
pub use models::{CompiledProgram, PendingTransaction};
pub use state::{decode_state, StateValue};
pub use types::{LedgerError, LedgerResult, NetworkConfig, WAIT_ROUNDS};
