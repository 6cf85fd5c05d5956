//! Asset lifecycle: create, reconfigure, opt-in, transfer, freeze,
//! clawback, destroy, plus holding and parameter reads.

use crate::blockchain::models::{Asset, AssetHolding};
use crate::blockchain::{LedgerError, LedgerResult};
use crate::transaction::{AssetConfig, AssetFreeze, AssetParams, AssetTransfer, TransactionSigner};
use crate::wallet::Address;
use crate::workflows::{Confirmation, WorkflowRunner};

/// New role addresses for an asset. A `None` role is cleared permanently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRoles {
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

impl WorkflowRunner {
    /// Create an asset; returns its id with the confirmation.
    pub async fn create_asset(
        &self,
        creator: &dyn TransactionSigner,
        params: AssetParams,
    ) -> LedgerResult<(u64, Confirmation)> {
        self.run("create_asset", async {
            tracing::info!(
                unit_name = %params.unit_name,
                total = params.total,
                decimals = params.decimals,
                "Creating asset"
            );
            let txn = self.build(creator.address(), AssetConfig::create(params)).await?;
            let confirmation = self.sign_and_submit("create_asset", &txn, creator).await?;
            let asset_id = confirmation.asset_id().ok_or_else(|| {
                LedgerError::Decode("confirmation carries no asset index".to_string())
            })?;
            tracing::info!(asset_id, "Asset created");
            Ok((asset_id, confirmation))
        })
        .await
    }

    /// Replace role addresses; must be signed by the current manager.
    pub async fn reconfigure_asset(
        &self,
        manager: &dyn TransactionSigner,
        asset_id: u64,
        roles: AssetRoles,
    ) -> LedgerResult<Confirmation> {
        self.run("reconfigure_asset", async {
            let config = AssetConfig::reconfigure(
                asset_id,
                roles.manager,
                roles.reserve,
                roles.freeze,
                roles.clawback,
            );
            let txn = self.build(manager.address(), config).await?;
            self.sign_and_submit("reconfigure_asset", &txn, manager).await
        })
        .await
    }

    /// Zero-amount self-transfer allowing `account` to hold the asset.
    pub async fn opt_in_asset(
        &self,
        account: &dyn TransactionSigner,
        asset_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("opt_in_asset", async {
            let txn = self
                .build(account.address(), AssetTransfer::opt_in(account.address(), asset_id))
                .await?;
            self.sign_and_submit("opt_in_asset", &txn, account).await
        })
        .await
    }

    pub async fn transfer_asset(
        &self,
        sender: &dyn TransactionSigner,
        asset_id: u64,
        receiver: Address,
        amount: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("transfer_asset", async {
            let txn = self
                .build(sender.address(), AssetTransfer::new(asset_id, receiver, amount))
                .await?;
            self.sign_and_submit("transfer_asset", &txn, sender).await
        })
        .await
    }

    /// Freeze or unfreeze `target`'s holding; signed by the freeze role.
    pub async fn freeze_asset(
        &self,
        freeze_manager: &dyn TransactionSigner,
        asset_id: u64,
        target: Address,
        frozen: bool,
    ) -> LedgerResult<Confirmation> {
        self.run("freeze_asset", async {
            let txn = self
                .build(freeze_manager.address(), AssetFreeze::new(asset_id, target, frozen))
                .await?;
            self.sign_and_submit("freeze_asset", &txn, freeze_manager).await
        })
        .await
    }

    /// Move `amount` from `holder` to `receiver`; signed by the clawback
    /// role, not the holder.
    pub async fn clawback_asset(
        &self,
        clawback: &dyn TransactionSigner,
        asset_id: u64,
        holder: Address,
        receiver: Address,
        amount: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("clawback_asset", async {
            let transfer = AssetTransfer::clawback(asset_id, holder, receiver, amount);
            let txn = self.build(clawback.address(), transfer).await?;
            self.sign_and_submit("clawback_asset", &txn, clawback).await
        })
        .await
    }

    /// Destroy an asset; the creator must hold the full supply.
    pub async fn destroy_asset(
        &self,
        manager: &dyn TransactionSigner,
        asset_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.run("destroy_asset", async {
            let txn = self.build(manager.address(), AssetConfig::destroy(asset_id)).await?;
            self.sign_and_submit("destroy_asset", &txn, manager).await
        })
        .await
    }

    /// `account`'s holding of `asset_id`, if opted in.
    pub async fn asset_holding(
        &self,
        account: &Address,
        asset_id: u64,
    ) -> LedgerResult<Option<AssetHolding>> {
        self.run("asset_holding", async {
            let info = self.algod().account_information(account).await?;
            let holding = info.assets.into_iter().find(|h| h.asset_id == asset_id);
            match &holding {
                Some(h) => tracing::info!(
                    address = %account,
                    asset_id,
                    amount = h.amount,
                    is_frozen = h.is_frozen,
                    "Asset holding"
                ),
                None => tracing::info!(address = %account, asset_id, "Account not opted in"),
            }
            Ok(holding)
        })
        .await
    }

    pub async fn asset_params(&self, asset_id: u64) -> LedgerResult<Asset> {
        self.run("asset_params", async {
            let asset = self.algod().asset_information(asset_id).await?;
            tracing::info!(
                asset_id,
                creator = %asset.params.creator,
                total = asset.params.total,
                manager = ?asset.params.manager,
                "Asset params"
            );
            Ok(asset)
        })
        .await
    }
}
