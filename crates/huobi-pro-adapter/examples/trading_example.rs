/*
[INPUT]:  API key pair from HUOBI_ACCESS_KEY / HUOBI_SECRET_KEY
[OUTPUT]: Account discovery, balance, order placement and cancellation
[POS]:    Examples - signed REST trading flow
[UPDATE]: When adding new trading endpoints
*/

use std::str::FromStr;

use huobi_pro_adapter::*;
use rust_decimal::Decimal;

/// Example: Place and cancel a far-from-market limit order
#[tokio::main]
async fn main() {
    println!("=== Huobi Trading Example ===\n");

    let (Ok(access_key), Ok(secret_key)) = (
        std::env::var("HUOBI_ACCESS_KEY"),
        std::env::var("HUOBI_SECRET_KEY"),
    ) else {
        eprintln!("Set HUOBI_ACCESS_KEY and HUOBI_SECRET_KEY to run this example");
        return;
    };

    let credentials = Credentials::new(access_key, secret_key);
    let exchange = match Huobi::connect(ClientConfig::default(), Some(credentials)).await {
        Ok(exchange) => exchange,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Trade account: {}\n", exchange.trade_account().id);

    match exchange.get_account_balance().await {
        Ok(balance) => {
            for entry in balance.non_zero() {
                println!("  {} {:?}: {}", entry.currency, entry.balance_type, entry.balance);
            }
        }
        Err(e) => println!("✗ Balance error: {}", e),
    }

    let amount = Decimal::from_str("0.001").unwrap_or_default();
    let price = Decimal::from_str("1000").unwrap_or_default();
    let order_id = match exchange.place(amount, price, "btcusdt", OrderType::BuyLimit).await {
        Ok(order_id) => {
            println!("\n✓ Order placed: {}", order_id);
            order_id
        }
        Err(e) => {
            println!("\n✗ Order rejected: {}", e);
            return;
        }
    };

    match exchange.get_order_info(&order_id).await {
        Ok(order) => println!("✓ Order state: {}", order.state.as_str()),
        Err(e) => println!("✗ Order lookup error: {}", e),
    }

    match exchange.submit_cancel(&order_id).await {
        Ok(()) => println!("✓ Cancel submitted"),
        Err(e) => println!("✗ Cancel error: {}", e),
    }

    let query = OrdersQuery::new("btcusdt", &[OrderState::Submitted, OrderState::PartialFilled]);
    match exchange.get_orders(&query).await {
        Ok(orders) => println!("✓ Open orders: {}", orders.len()),
        Err(e) => println!("✗ Orders error: {}", e),
    }

    let _ = exchange.shutdown().await;
    println!("\n✓ Trading example complete");
}
