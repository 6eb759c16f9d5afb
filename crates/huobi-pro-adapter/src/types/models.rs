/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AccountState, AccountType, BalanceType, OrderSource, OrderState, OrderType};

/// One entry of `/v1/account/accounts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub state: AccountState,
    #[serde(rename = "user-id", default)]
    pub user_id: i64,
}

impl Account {
    pub fn is_spot(&self) -> bool {
        self.account_type == AccountType::Spot
    }
}

/// Pick the default trading account: the first spot account in the list.
pub fn select_trade_account(accounts: &[Account]) -> Option<&Account> {
    accounts.iter().find(|account| account.is_spot())
}

/// A single currency line of an account balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAccount {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(rename = "type")]
    pub balance_type: BalanceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub id: i64,
    #[serde(default)]
    pub state: AccountState,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub list: Vec<SubAccount>,
    #[serde(rename = "user-id", default)]
    pub user_id: i64,
}

impl Balance {
    /// Sum of the given line type for a currency, zero when absent.
    pub fn amount(&self, currency: &str, balance_type: BalanceType) -> Decimal {
        self.list
            .iter()
            .filter(|line| line.currency == currency && line.balance_type == balance_type)
            .map(|line| line.balance)
            .sum()
    }

    /// Currencies holding a non-zero balance of any kind
    pub fn non_zero(&self) -> impl Iterator<Item = &SubAccount> {
        self.list.iter().filter(|line| !line.balance.is_zero())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Order {
    pub id: i64,
    pub symbol: String,
    #[serde(default)]
    pub account_id: i64,
    pub state: OrderState,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub field_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub field_cash_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub field_fees: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OrderSource>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub finished_at: i64,
    #[serde(default)]
    pub canceled_at: i64,
}
