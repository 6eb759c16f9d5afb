/*
[INPUT]:  Symbol identifiers (e.g., "btcusdt")
[OUTPUT]: Live trade ticks and depth snapshots printed to stdout
[POS]:    Examples - public market data subscriptions
[UPDATE]: When adding new market data channels
*/

use std::time::Duration;

use huobi_pro_adapter::*;

/// Example: Subscribe to market data (no credentials required)
#[tokio::main]
async fn main() {
    println!("=== Huobi Market Data Example ===\n");

    let exchange = match Huobi::connect(ClientConfig::default(), None).await {
        Ok(exchange) => exchange,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected to {}\n", exchange.exchange_name());

    let symbols = ["btcusdt", "ethusdt"];

    if let Err(e) = exchange
        .subscribe_trade_detail(&symbols, |symbol: &str, detail: TradeDetail| {
            println!("[{}] {}", symbol, detail);
        })
        .await
    {
        eprintln!("✗ Trade subscription failed: {}", e);
        return;
    }

    if let Err(e) = exchange
        .subscribe_depth(&symbols, |symbol: &str, depth: MarketDepth| {
            println!(
                "[{}] best bid: {:?} best ask: {:?}",
                symbol,
                depth.tick.best_bid(),
                depth.tick.best_ask()
            );
        })
        .await
    {
        eprintln!("✗ Depth subscription failed: {}", e);
        return;
    }

    tokio::time::sleep(Duration::from_secs(10)).await;

    if let Err(e) = exchange.shutdown().await {
        eprintln!("✗ Shutdown failed: {}", e);
    }
    println!("\n✓ Market data example complete");
}
