/*
[INPUT]:  Order requests, order ids and query filters
[OUTPUT]: Order ids, order details and order lists
[POS]:    HTTP layer - trading endpoints (signed POST body / signed GET query)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use crate::auth::ParamMap;
use crate::http::{HuobiClient, Result};
use crate::types::{Order, OrdersQuery, PlaceOrderRequest};

pub const ORDERS_PATH: &str = "/v1/order/orders";

impl HuobiClient {
    /// Place a new order, returning the exchange order id
    ///
    /// POST /v1/order/orders/place
    pub async fn place_order(&self, req: &PlaceOrderRequest) -> Result<String> {
        let path = format!("{ORDERS_PATH}/place");
        self.post_json(&path, &req.to_params()).await
    }

    /// Request cancellation of an order
    ///
    /// POST /v1/order/orders/{order-id}/submitcancel
    pub async fn submit_cancel(&self, order_id: &str) -> Result<()> {
        let path = format!("{ORDERS_PATH}/{order_id}/submitcancel");
        let _order_id: String = self.post_json(&path, &ParamMap::new()).await?;
        Ok(())
    }

    /// Query one order
    ///
    /// GET /v1/order/orders/{order-id}
    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        let path = format!("{ORDERS_PATH}/{order_id}");
        self.get_json(&path, &ParamMap::new()).await
    }

    /// List orders matching the filters
    ///
    /// GET /v1/order/orders?symbol={symbol}&states={states}
    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<Vec<Order>> {
        self.get_json(ORDERS_PATH, &query.to_params()).await
    }
}
