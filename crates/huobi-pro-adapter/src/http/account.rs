/*
[INPUT]:  Account ids and API credentials
[OUTPUT]: Account lists and balances
[POS]:    HTTP layer - account endpoints (signed GET)
[UPDATE]: When adding account endpoints or changing response types
*/

use crate::auth::ParamMap;
use crate::http::{HuobiClient, Result};
use crate::types::{Account, Balance, select_trade_account};
use tracing::info;

pub const ACCOUNTS_PATH: &str = "/v1/account/accounts";

impl HuobiClient {
    /// List all accounts of the key owner
    ///
    /// GET /v1/account/accounts
    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.get_json(ACCOUNTS_PATH, &ParamMap::new()).await
    }

    /// Query the balance of one account
    ///
    /// GET /v1/account/accounts/{account-id}/balance
    pub async fn get_account_balance(&self, account_id: i64) -> Result<Balance> {
        let path = format!("{ACCOUNTS_PATH}/{account_id}/balance");
        self.get_json(&path, &ParamMap::new()).await
    }

    /// List accounts and pick the first spot account.
    ///
    /// Returns `Account::default()` (id 0) when no spot account exists; the
    /// exchange rejects orders placed against it.
    pub async fn discover_trade_account(&self) -> Result<Account> {
        let accounts = self.get_accounts().await?;
        match select_trade_account(&accounts) {
            Some(account) => {
                info!(account_id = account.id, user_id = account.user_id, "trade account selected");
                Ok(account.clone())
            }
            None => {
                info!(account_count = accounts.len(), "no spot account found");
                Ok(Account::default())
            }
        }
    }
}
