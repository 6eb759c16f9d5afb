/*
[INPUT]:  Client configuration, optional credentials, market transport
[OUTPUT]: Typed account/order operations and market-data subscriptions
[POS]:    Facade - composes REST client, dispatcher and market stream
[UPDATE]: When adding exchange operations or subscription kinds
*/

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::{ClientConfig, Credentials, HuobiClient, HuobiError, Result};
use crate::types::{Account, Balance, Order, OrderType, OrdersQuery, PlaceOrderRequest};
use crate::ws::{
    MarketDepth, MarketStream, MarketTransport, SubscriptionDispatcher, TradeDetail, depth_topic,
    spawn_dispatch_loop, trade_detail_topic,
};

pub const EXCHANGE_NAME: &str = "HuobiPro";

/// Huobi spot exchange: REST trading plus market-data subscriptions.
///
/// Constructed with credentials, it discovers the spot account once and uses
/// it as the default account for balances and orders. Without credentials it
/// only serves market data.
pub struct Huobi<T: MarketTransport = MarketStream> {
    client: HuobiClient,
    trade_account: Account,
    dispatcher: Arc<SubscriptionDispatcher>,
    transport: T,
    shutdown: CancellationToken,
}

impl Huobi<MarketStream> {
    /// Discover the trade account (when credentials are given), connect the
    /// market stream and start dispatching.
    pub async fn connect(config: ClientConfig, credentials: Option<Credentials>) -> Result<Self> {
        let ws_url = config.ws_url.clone();
        let mut client = HuobiClient::with_config(config)?;
        if let Some(credentials) = credentials.filter(|c| !c.access_key.is_empty()) {
            client.set_credentials(credentials);
        }

        let mut stream = MarketStream::new();
        let receiver = stream
            .take_receiver()
            .ok_or_else(|| HuobiError::WebSocket("stream receiver already taken".to_string()))?;

        let dispatcher = Arc::new(SubscriptionDispatcher::new());
        let exchange = Self::from_parts(client, stream, dispatcher.clone()).await?;

        exchange.transport.connect(&ws_url).await?;
        spawn_dispatch_loop(receiver, dispatcher, exchange.shutdown.clone());

        info!(
            exchange = EXCHANGE_NAME,
            trading = exchange.can_trade(),
            "exchange initialized"
        );
        Ok(exchange)
    }
}

impl<T: MarketTransport> Huobi<T> {
    /// Assemble from an existing client, transport and dispatcher.
    ///
    /// Runs account discovery when the client carries credentials; a remote
    /// rejection fails construction.
    pub async fn from_parts(
        client: HuobiClient,
        transport: T,
        dispatcher: Arc<SubscriptionDispatcher>,
    ) -> Result<Self> {
        let trade_account = if client.credentials().is_some() {
            client.discover_trade_account().await?
        } else {
            info!("no credentials; market data only");
            Account::default()
        };

        Ok(Self {
            client,
            trade_account,
            dispatcher,
            transport,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn exchange_name(&self) -> &'static str {
        EXCHANGE_NAME
    }

    pub fn can_trade(&self) -> bool {
        self.client.credentials().is_some()
    }

    pub fn trade_account(&self) -> &Account {
        &self.trade_account
    }

    pub fn client(&self) -> &HuobiClient {
        &self.client
    }

    pub fn dispatcher(&self) -> &Arc<SubscriptionDispatcher> {
        &self.dispatcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Token cancelled by `shutdown`; stops the dispatch loop
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.client.get_accounts().await
    }

    /// Balance of the discovered trade account
    pub async fn get_account_balance(&self) -> Result<Balance> {
        self.client.get_account_balance(self.trade_account.id).await
    }

    /// Place an order on the trade account with source `api`.
    ///
    /// Market orders are sent without a price.
    pub async fn place(
        &self,
        amount: Decimal,
        price: Decimal,
        symbol: &str,
        order_type: OrderType,
    ) -> Result<String> {
        let account_id = self.trade_account.id;
        let req = if order_type.is_market() {
            PlaceOrderRequest::market(account_id, symbol, order_type, amount)
        } else {
            PlaceOrderRequest::limit(account_id, symbol, order_type, amount, price)
        };
        self.place_order(&req).await
    }

    pub async fn place_order(&self, req: &PlaceOrderRequest) -> Result<String> {
        self.client.place_order(req).await
    }

    pub async fn submit_cancel(&self, order_id: &str) -> Result<()> {
        self.client.submit_cancel(order_id).await
    }

    pub async fn get_order_info(&self, order_id: &str) -> Result<Order> {
        self.client.get_order(order_id).await
    }

    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<Vec<Order>> {
        self.client.get_orders(query).await
    }

    /// Route trade ticks of `symbols` to `listener`.
    ///
    /// The listener is registered before the subscribe directive goes out so
    /// the first pushed message is not dropped.
    pub async fn subscribe_trade_detail<F>(&self, symbols: &[&str], listener: F) -> Result<()>
    where
        F: Fn(&str, TradeDetail) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        for symbol in symbols {
            let listener = listener.clone();
            self.dispatcher
                .register_trade_detail(symbol, move |symbol: &str, detail: TradeDetail| {
                    listener(symbol, detail)
                });
            self.transport.subscribe(&trade_detail_topic(symbol)).await?;
        }
        Ok(())
    }

    /// Route depth snapshots of `symbols` to `listener`
    pub async fn subscribe_depth<F>(&self, symbols: &[&str], listener: F) -> Result<()>
    where
        F: Fn(&str, MarketDepth) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        for symbol in symbols {
            let listener = listener.clone();
            self.dispatcher
                .register_depth(symbol, move |symbol: &str, depth: MarketDepth| {
                    listener(symbol, depth)
                });
            self.transport.subscribe(&depth_topic(symbol)).await?;
        }
        Ok(())
    }

    /// Stop dispatching and close the market stream
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        self.transport.close().await
    }
}

impl<T: MarketTransport + std::fmt::Debug> std::fmt::Debug for Huobi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Huobi")
            .field("client", &self.client)
            .field("trade_account", &self.trade_account)
            .field("dispatcher", &self.dispatcher)
            .field("transport", &self.transport)
            .finish()
    }
}
