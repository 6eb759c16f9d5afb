/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    Spot,
    Margin,
    SuperMargin,
    Otc,
    Point,
    Investment,
    Borrow,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    Working,
    Lock,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Balance line kind within an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceType {
    Trade,
    Frozen,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    BuyMarket,
    SellMarket,
    BuyLimit,
    SellLimit,
    BuyIoc,
    SellIoc,
    BuyLimitMaker,
    SellLimitMaker,
    BuyStopLimit,
    SellStopLimit,
    BuyLimitFok,
    SellLimitFok,
    BuyStopLimitFok,
    SellStopLimitFok,
    /// Any type not listed above
    #[serde(other)]
    Unknown,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::BuyMarket => "buy-market",
            OrderType::SellMarket => "sell-market",
            OrderType::BuyLimit => "buy-limit",
            OrderType::SellLimit => "sell-limit",
            OrderType::BuyIoc => "buy-ioc",
            OrderType::SellIoc => "sell-ioc",
            OrderType::BuyLimitMaker => "buy-limit-maker",
            OrderType::SellLimitMaker => "sell-limit-maker",
            OrderType::BuyStopLimit => "buy-stop-limit",
            OrderType::SellStopLimit => "sell-stop-limit",
            OrderType::BuyLimitFok => "buy-limit-fok",
            OrderType::SellLimitFok => "sell-limit-fok",
            OrderType::BuyStopLimitFok => "buy-stop-limit-fok",
            OrderType::SellStopLimitFok => "sell-stop-limit-fok",
            OrderType::Unknown => "unknown",
        }
    }

    /// Market orders are priced by the book; the request carries no price.
    pub fn is_market(&self) -> bool {
        matches!(self, OrderType::BuyMarket | OrderType::SellMarket)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an order originates from.
///
/// Orders placed outside the API (web, app, system) decode as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSource {
    #[default]
    Api,
    MarginApi,
    #[serde(other)]
    Other,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Api => "api",
            OrderSource::MarginApi => "margin-api",
            OrderSource::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderState {
    Created,
    PreSubmitted,
    Submitting,
    Submitted,
    PartialFilled,
    PartialCanceled,
    Filled,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Created => "created",
            OrderState::PreSubmitted => "pre-submitted",
            OrderState::Submitting => "submitting",
            OrderState::Submitted => "submitted",
            OrderState::PartialFilled => "partial-filled",
            OrderState::PartialCanceled => "partial-canceled",
            OrderState::Filled => "filled",
            OrderState::Canceled => "canceled",
            OrderState::Unknown => "unknown",
        }
    }
}

/// Aggressor side of a trade tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}
