/*
[INPUT]:  Typed order/query parameters
[OUTPUT]: String parameter maps at the serialization boundary
[POS]:    Data layer - request definitions for API communication
[UPDATE]: When API schema changes or new request fields added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderSource, OrderState, OrderType};
use crate::auth::ParamMap;

/// Body of `POST /v1/order/orders/place`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub account_id: i64,
    /// Quantity for limit orders; quote amount for market buys, base amount for market sells
    pub amount: Decimal,
    /// Omitted for market orders
    pub price: Option<Decimal>,
    pub source: OrderSource,
    pub symbol: String,
    pub order_type: OrderType,
}

impl PlaceOrderRequest {
    pub fn limit(
        account_id: i64,
        symbol: impl Into<String>,
        order_type: OrderType,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            account_id,
            amount,
            price: Some(price),
            source: OrderSource::Api,
            symbol: symbol.into(),
            order_type,
        }
    }

    pub fn market(
        account_id: i64,
        symbol: impl Into<String>,
        order_type: OrderType,
        amount: Decimal,
    ) -> Self {
        Self {
            account_id,
            amount,
            price: None,
            source: OrderSource::Api,
            symbol: symbol.into(),
            order_type,
        }
    }

    pub fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("account-id".to_string(), self.account_id.to_string());
        params.insert("amount".to_string(), self.amount.normalize().to_string());
        if let Some(price) = self.price {
            params.insert("price".to_string(), price.normalize().to_string());
        }
        params.insert("source".to_string(), self.source.as_str().to_string());
        params.insert("symbol".to_string(), self.symbol.clone());
        params.insert("type".to_string(), self.order_type.as_str().to_string());
        params
    }
}

/// Filters for `GET /v1/order/orders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersQuery {
    pub symbol: String,
    pub states: Vec<OrderState>,
    pub types: Vec<OrderType>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Order id to page from
    pub from: Option<i64>,
    /// `prev` or `next`
    pub direct: Option<String>,
    pub size: Option<u32>,
}

impl OrdersQuery {
    pub fn new(symbol: impl Into<String>, states: &[OrderState]) -> Self {
        Self {
            symbol: symbol.into(),
            states: states.to_vec(),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("symbol".to_string(), self.symbol.clone());
        if !self.states.is_empty() {
            params.insert("states".to_string(), join_names(self.states.iter().map(OrderState::as_str)));
        }
        if !self.types.is_empty() {
            params.insert("types".to_string(), join_names(self.types.iter().map(OrderType::as_str)));
        }
        if let Some(start_date) = &self.start_date {
            params.insert("start-date".to_string(), start_date.clone());
        }
        if let Some(end_date) = &self.end_date {
            params.insert("end-date".to_string(), end_date.clone());
        }
        if let Some(from) = self.from {
            params.insert("from".to_string(), from.to_string());
        }
        if let Some(direct) = &self.direct {
            params.insert("direct".to_string(), direct.clone());
        }
        if let Some(size) = self.size {
            params.insert("size".to_string(), size.to_string());
        }
        params
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_limit_order_params() {
        let req = PlaceOrderRequest::limit(
            2,
            "btcusdt",
            OrderType::BuyLimit,
            Decimal::from_str("0.0100").unwrap(),
            Decimal::from_str("30000.50").unwrap(),
        );
        let params = req.to_params();

        assert_eq!(params["account-id"], "2");
        assert_eq!(params["amount"], "0.01");
        assert_eq!(params["price"], "30000.5");
        assert_eq!(params["source"], "api");
        assert_eq!(params["symbol"], "btcusdt");
        assert_eq!(params["type"], "buy-limit");
    }

    #[test]
    fn test_market_order_omits_price() {
        let req = PlaceOrderRequest::market(2, "btcusdt", OrderType::BuyMarket, Decimal::from(10));
        let params = req.to_params();
        assert!(!params.contains_key("price"));
        assert_eq!(params["amount"], "10");
    }

    #[test]
    fn test_orders_query_params() {
        let query = OrdersQuery::new("ethusdt", &[OrderState::Submitted, OrderState::PartialFilled]);
        let params = query.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["symbol"], "ethusdt");
        assert_eq!(params["states"], "submitted,partial-filled");

        let paged = OrdersQuery {
            size: Some(50),
            direct: Some("next".to_string()),
            types: vec![OrderType::SellLimit],
            ..query
        };
        let params = paged.to_params();
        assert_eq!(params["size"], "50");
        assert_eq!(params["direct"], "next");
        assert_eq!(params["types"], "sell-limit");
    }
}
