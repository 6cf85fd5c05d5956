//! ABI method calls.
//!
//! # Data Flow
//! ```text
//! "name(args)ret" signature
//!     → method.rs (parse, selector, reference resolution)
//!     → codec.rs (argument and return encoding)
//!     → composer.rs (group, sign, submit, decode returns)
//! ```

pub mod codec;
pub mod composer;
pub mod method;
pub mod types;

pub use composer::{
    AbiResult, AtomicTransactionComposer, ComposerStatus, ExecuteResult, MethodCallParams,
    TransactionWithSigner,
};
pub use method::{Method, RETURN_PREFIX};
pub use types::{AbiError, AbiType, AbiValue};
