/*
[INPUT]:  Validated watch configuration, shutdown token
[OUTPUT]: Logged trade ticks, depth tops and account balance
[POS]:    Runtime layer - drives the exchange facade until shutdown
[UPDATE]: When adding new feeds or startup reports
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use huobi_pro_adapter::{Huobi, MarketDepth, MarketTransport, TradeDetail};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;

/// Message counters shared with the stream listeners
#[derive(Debug, Default)]
pub struct WatchStats {
    trades: AtomicU64,
    depth_updates: AtomicU64,
}

impl WatchStats {
    pub fn trades(&self) -> u64 {
        self.trades.load(Ordering::Relaxed)
    }

    pub fn depth_updates(&self) -> u64 {
        self.depth_updates.load(Ordering::Relaxed)
    }

    fn record_trade(&self, symbol: &str, detail: &TradeDetail) {
        self.trades.fetch_add(1, Ordering::Relaxed);
        match detail.latest() {
            Some(tick) => info!(
                symbol,
                price = tick.price,
                amount = tick.amount,
                direction = ?tick.direction,
                trades = detail.tick.data.len(),
                "trade"
            ),
            None => debug!(symbol, "empty trade batch"),
        }
    }

    fn record_depth(&self, symbol: &str, depth: &MarketDepth) {
        self.depth_updates.fetch_add(1, Ordering::Relaxed);
        let bid = depth.tick.best_bid();
        let ask = depth.tick.best_ask();
        debug!(
            symbol,
            bid = ?bid,
            ask = ?ask,
            version = depth.tick.version,
            "depth"
        );
    }
}

/// Subscribe the feeds enabled in `config`, counting into `stats`
pub async fn subscribe_feeds<T: MarketTransport>(
    exchange: &Huobi<T>,
    config: &WatchConfig,
    stats: Arc<WatchStats>,
) -> Result<()> {
    let symbols = config.symbol_refs();

    if config.trade_detail {
        let stats = stats.clone();
        exchange
            .subscribe_trade_detail(&symbols, move |symbol: &str, detail: TradeDetail| {
                stats.record_trade(symbol, &detail)
            })
            .await
            .context("subscribe trade detail")?;
    }

    if config.depth {
        exchange
            .subscribe_depth(&symbols, move |symbol: &str, depth: MarketDepth| {
                stats.record_depth(symbol, &depth)
            })
            .await
            .context("subscribe depth")?;
    }

    info!(
        symbols = ?symbols,
        trade_detail = config.trade_detail,
        depth = config.depth,
        "feeds subscribed"
    );
    Ok(())
}

/// Log the non-zero balances of the trade account
pub async fn report_balance<T: MarketTransport>(exchange: &Huobi<T>) -> Result<usize> {
    let balance = exchange
        .get_account_balance()
        .await
        .context("query trade account balance")?;

    let mut reported = 0;
    for entry in balance.non_zero() {
        info!(
            account_id = balance.id,
            currency = %entry.currency,
            balance_type = ?entry.balance_type,
            amount = %entry.balance,
            "balance"
        );
        reported += 1;
    }
    Ok(reported)
}

/// Connect, subscribe and log until `shutdown` fires
pub async fn run(config: WatchConfig, shutdown: CancellationToken) -> Result<()> {
    let exchange = Huobi::connect(config.client_config(), config.credentials())
        .await
        .context("connect exchange")?;
    info!(
        exchange = exchange.exchange_name(),
        account_id = exchange.trade_account().id,
        "exchange connected"
    );

    if exchange.can_trade() {
        if let Err(err) = report_balance(&exchange).await {
            warn!(error = %err, "balance report failed");
        }
    }

    let stats = Arc::new(WatchStats::default());
    subscribe_feeds(&exchange, &config, stats.clone()).await?;

    shutdown.cancelled().await;
    info!("shutdown requested");

    exchange.shutdown().await.context("close exchange")?;
    info!(
        trades = stats.trades(),
        depth_updates = stats.depth_updates(),
        "watch finished"
    );
    Ok(())
}
