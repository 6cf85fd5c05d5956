//! Transaction request types and error definitions.

use thiserror::Error;

use crate::wallet::Address;

/// Maximum number of transactions in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

/// Errors raised while constructing, encoding or signing requests.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Msgpack encoding failed.
    #[error("Encoding error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// A group needs at least one transaction.
    #[error("Cannot group an empty set of transactions")]
    EmptyGroup,

    /// Too many transactions for one group.
    #[error("Group of {0} transactions exceeds the limit of 16")]
    GroupTooLarge(usize),

    /// Signer is not part of the multisig descriptor.
    #[error("{0} is not a member of the multisig")]
    NotMultisigMember(Address),

    /// Partial signatures or programs do not line up.
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// Network parameters every request is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParams {
    /// Fee per byte, or the absolute fee when `flat_fee` is set.
    pub fee: u64,
    pub min_fee: u64,
    pub flat_fee: bool,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

/// Fields shared by every transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
    pub note: Vec<u8>,
    pub lease: Option<[u8; 32]>,
    pub rekey_to: Option<Address>,
    pub group: Option<[u8; 32]>,
}

/// A request to the ledger, not yet signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub header: Header,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    Payment(Payment),
    AssetConfig(AssetConfig),
    AssetTransfer(AssetTransfer),
    AssetFreeze(AssetFreeze),
    ApplicationCall(ApplicationCall),
}

impl TransactionKind {
    /// Type tag carried on the wire.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TransactionKind::Payment(_) => "pay",
            TransactionKind::AssetConfig(_) => "acfg",
            TransactionKind::AssetTransfer(_) => "axfer",
            TransactionKind::AssetFreeze(_) => "afrz",
            TransactionKind::ApplicationCall(_) => "appl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub receiver: Address,
    pub amount: u64,
    pub close_remainder_to: Option<Address>,
}

impl Payment {
    pub fn new(receiver: Address, amount: u64) -> Self {
        Self {
            receiver,
            amount,
            close_remainder_to: None,
        }
    }

    /// Send the remaining balance to `target` and close the sender.
    pub fn close_remainder_to(mut self, target: Address) -> Self {
        self.close_remainder_to = Some(target);
        self
    }
}

/// Parameters of a created asset. Role addresses are changeable only by
/// the current manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub metadata_hash: Option<[u8; 32]>,
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

impl AssetParams {
    fn is_empty(&self) -> bool {
        *self == AssetParams::default()
    }
}

/// Create (`asset_id == 0`), reconfigure, or destroy (no params) an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    pub asset_id: u64,
    pub params: Option<AssetParams>,
}

impl AssetConfig {
    pub fn create(params: AssetParams) -> Self {
        Self {
            asset_id: 0,
            params: Some(params),
        }
    }

    /// Replace the role addresses. Omitted roles are cleared for good.
    pub fn reconfigure(
        asset_id: u64,
        manager: Option<Address>,
        reserve: Option<Address>,
        freeze: Option<Address>,
        clawback: Option<Address>,
    ) -> Self {
        let params = AssetParams {
            manager,
            reserve,
            freeze,
            clawback,
            ..AssetParams::default()
        };
        Self {
            asset_id,
            params: (!params.is_empty()).then_some(params),
        }
    }

    pub fn destroy(asset_id: u64) -> Self {
        Self {
            asset_id,
            params: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTransfer {
    pub asset_id: u64,
    pub amount: u64,
    pub receiver: Address,
    pub close_to: Option<Address>,
    /// Holder whose balance is clawed back; sender must be the clawback role.
    pub revocation_target: Option<Address>,
}

impl AssetTransfer {
    pub fn new(asset_id: u64, receiver: Address, amount: u64) -> Self {
        Self {
            asset_id,
            amount,
            receiver,
            close_to: None,
            revocation_target: None,
        }
    }

    /// Zero-amount self-transfer that opts `account` into the asset.
    pub fn opt_in(account: Address, asset_id: u64) -> Self {
        Self::new(asset_id, account, 0)
    }

    /// Move `amount` out of `holder` into `receiver`.
    pub fn clawback(asset_id: u64, holder: Address, receiver: Address, amount: u64) -> Self {
        Self {
            revocation_target: Some(holder),
            ..Self::new(asset_id, receiver, amount)
        }
    }

    pub fn close_to(mut self, target: Address) -> Self {
        self.close_to = Some(target);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFreeze {
    pub asset_id: u64,
    pub target: Address,
    pub frozen: bool,
}

impl AssetFreeze {
    pub fn new(asset_id: u64, target: Address, frozen: bool) -> Self {
        Self {
            asset_id,
            target,
            frozen,
        }
    }
}

/// What happens to the caller's relationship with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    #[default]
    NoOp = 0,
    OptIn = 1,
    /// Normal exit; the approval program may refuse it.
    CloseOut = 2,
    /// Forced exit; always removes local state.
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

/// Storage allocation for global or per-account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSchema {
    pub num_uints: u64,
    pub num_byte_slices: u64,
}

impl StateSchema {
    pub fn new(num_uints: u64, num_byte_slices: u64) -> Self {
        Self {
            num_uints,
            num_byte_slices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationCall {
    /// Zero when creating.
    pub app_id: u64,
    pub on_complete: OnComplete,
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
    pub extra_pages: u32,
    pub args: Vec<Vec<u8>>,
    pub accounts: Vec<Address>,
    pub foreign_apps: Vec<u64>,
    pub foreign_assets: Vec<u64>,
}

impl ApplicationCall {
    pub fn create(
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Self {
        Self {
            approval_program,
            clear_program,
            global_schema,
            local_schema,
            ..Self::default()
        }
    }

    pub fn call(app_id: u64) -> Self {
        Self::with_on_complete(app_id, OnComplete::NoOp)
    }

    pub fn update(app_id: u64, approval_program: Vec<u8>, clear_program: Vec<u8>) -> Self {
        Self {
            approval_program,
            clear_program,
            ..Self::with_on_complete(app_id, OnComplete::UpdateApplication)
        }
    }

    pub fn with_on_complete(app_id: u64, on_complete: OnComplete) -> Self {
        Self {
            app_id,
            on_complete,
            ..Self::default()
        }
    }

    pub fn args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args = args;
        self
    }

    pub fn accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn foreign_apps(mut self, apps: Vec<u64>) -> Self {
        self.foreign_apps = apps;
        self
    }

    pub fn foreign_assets(mut self, assets: Vec<u64>) -> Self {
        self.foreign_assets = assets;
        self
    }

    pub fn extra_pages(mut self, pages: u32) -> Self {
        self.extra_pages = pages;
        self
    }
}

impl From<Payment> for TransactionKind {
    fn from(value: Payment) -> Self {
        TransactionKind::Payment(value)
    }
}

impl From<AssetConfig> for TransactionKind {
    fn from(value: AssetConfig) -> Self {
        TransactionKind::AssetConfig(value)
    }
}

impl From<AssetTransfer> for TransactionKind {
    fn from(value: AssetTransfer) -> Self {
        TransactionKind::AssetTransfer(value)
    }
}

impl From<AssetFreeze> for TransactionKind {
    fn from(value: AssetFreeze) -> Self {
        TransactionKind::AssetFreeze(value)
    }
}

impl From<ApplicationCall> for TransactionKind {
    fn from(value: ApplicationCall) -> Self {
        TransactionKind::ApplicationCall(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        let kind: TransactionKind = Payment::new(Address::ZERO, 1).into();
        assert_eq!(kind.type_tag(), "pay");
        let kind: TransactionKind = AssetFreeze::new(1, Address::ZERO, true).into();
        assert_eq!(kind.type_tag(), "afrz");
    }

    #[test]
    fn test_reconfigure_without_roles_drops_params() {
        let config = AssetConfig::reconfigure(5, None, None, None, None);
        assert!(config.params.is_none());

        let manager = Address::new([1u8; 32]);
        let config = AssetConfig::reconfigure(5, Some(manager), None, None, None);
        assert_eq!(config.params.unwrap().manager, Some(manager));
    }

    #[test]
    fn test_clawback_sets_revocation_target() {
        let holder = Address::new([1u8; 32]);
        let receiver = Address::new([2u8; 32]);
        let transfer = AssetTransfer::clawback(7, holder, receiver, 10);
        assert_eq!(transfer.revocation_target, Some(holder));
        assert_eq!(transfer.receiver, receiver);
    }

    #[test]
    fn test_on_complete_discriminants() {
        assert_eq!(OnComplete::NoOp as u64, 0);
        assert_eq!(OnComplete::ClearState as u64, 3);
        assert_eq!(OnComplete::DeleteApplication as u64, 5);
    }
}
