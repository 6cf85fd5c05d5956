//! Account generation, recovery and balance lookup.

use crate::blockchain::models::AccountInformation;
use crate::blockchain::LedgerResult;
use crate::wallet::{Account, Address, WalletResult};
use crate::workflows::WorkflowRunner;

/// Generate a fresh account. Only the address is logged.
pub fn generate_account() -> Account {
    let account = Account::generate();
    tracing::info!(address = %account.address(), "Account generated");
    account
}

/// Recover an account from its 25-word backup phrase.
pub fn recover_account(phrase: &str) -> WalletResult<Account> {
    let account = Account::from_mnemonic(phrase)
        .inspect_err(|e| tracing::error!(error = %e, "Account recovery failed"))?;
    tracing::info!(address = %account.address(), "Account recovered");
    Ok(account)
}

impl WorkflowRunner {
    pub async fn account_information(&self, address: &Address) -> LedgerResult<AccountInformation> {
        self.run("account_information", self.algod().account_information(address))
            .await
    }

    /// Balance of `address` in base units.
    pub async fn account_balance(&self, address: &Address) -> LedgerResult<u64> {
        self.run("account_balance", async {
            let info = self.algod().account_information(address).await?;
            tracing::info!(
                address = %address,
                amount = info.amount,
                min_balance = info.min_balance,
                "Account balance"
            );
            Ok(info.amount)
        })
        .await
    }
}
