/*
[INPUT]:  WebSocket test scenarios
[OUTPUT]: Test results for WebSocket client
[POS]:    Integration tests - WebSocket
[UPDATE]: When WebSocket client changes
*/

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use futures_util::{SinkExt, StreamExt};
use huobi_pro_adapter::ws::spawn_dispatch_loop;
use huobi_pro_adapter::{HuobiError, MarketStream, MarketTransport, SubscriptionDispatcher, TradeDetail};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

const TRADE: &str = r#"{"ch":"market.btcusdt.trade.detail","ts":1630994963175,"tick":{"id":1,"ts":1630994963173,"data":[{"ts":1630994963173,"tradeId":102523573486,"amount":0.006754,"price":52648.62,"direction":"buy"}]}}"#;

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_stream_creation() {
    let mut stream = MarketStream::new();
    assert!(stream.take_receiver().is_some());
}

#[test]
fn test_stream_default() {
    let mut stream: MarketStream = Default::default();
    assert!(stream.take_receiver().is_some());
}

#[test]
fn test_stream_receiver_take_once() {
    let mut stream = MarketStream::new();
    assert!(stream.take_receiver().is_some());
    assert!(stream.take_receiver().is_none());
}

#[tokio::test]
async fn test_subscribe_before_connect_fails() {
    let stream = MarketStream::new();
    let err = stream.subscribe("market.btcusdt.trade.detail").await.unwrap_err();
    assert!(matches!(err, HuobiError::NotConnected));
}

#[tokio::test]
async fn test_connect_to_unreachable_host_fails() {
    let stream = MarketStream::new();
    let err = stream.connect("ws://127.0.0.1:1/ws").await.unwrap_err();
    assert!(matches!(err, HuobiError::WebSocket(_)));
    assert!(!stream.is_connected().await);
}

/// Local server: sends a gzip ping, waits for the pong and a `sub`
/// directive, then pushes one gzip trade frame.
#[tokio::test]
async fn test_heartbeat_subscribe_and_dispatch() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        ws.send(Message::Binary(gzip(r#"{"ping":1492420473027}"#).into()))
            .await
            .unwrap();

        let mut pong = None;
        let mut sub = None;
        while pong.is_none() || sub.is_none() {
            let Some(Ok(Message::Text(text))) = ws.next().await else {
                panic!("connection ended before pong and sub");
            };
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            if let Some(value) = value.get("pong") {
                pong = value.as_i64();
            }
            if let Some(topic) = value.get("sub").and_then(|v| v.as_str()) {
                assert!(value.get("id").and_then(|v| v.as_str()).is_some());
                sub = Some(topic.to_string());
            }
        }

        ws.send(Message::Binary(
            gzip(r#"{"id":"x","status":"ok","subbed":"market.btcusdt.trade.detail","ts":1}"#).into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Binary(gzip(TRADE).into())).await.unwrap();
        (pong, sub, ws)
    });

    let mut stream = MarketStream::new();
    let receiver = stream.take_receiver().unwrap();
    stream.connect(&format!("ws://{addr}/ws")).await.unwrap();
    assert!(stream.is_connected().await);

    let dispatcher = Arc::new(SubscriptionDispatcher::new());
    let (delivered_tx, mut delivered_rx) = mpsc::unbounded_channel();
    dispatcher.register_trade_detail("btcusdt", move |symbol: &str, detail: TradeDetail| {
        let _ = delivered_tx.send((symbol.to_string(), detail));
    });
    let shutdown = CancellationToken::new();
    let dispatch = spawn_dispatch_loop(receiver, dispatcher, shutdown.clone());

    stream.subscribe("market.btcusdt.trade.detail").await.unwrap();

    let (symbol, detail) = tokio::time::timeout(Duration::from_secs(5), delivered_rx.recv())
        .await
        .expect("trade should be dispatched")
        .expect("listener channel open");
    assert_eq!(symbol, "btcusdt");
    assert_eq!(detail.latest().unwrap().price, 52648.62);

    let (pong, sub, _ws) = server.await.unwrap();
    assert_eq!(pong, Some(1492420473027));
    assert_eq!(sub.as_deref(), Some("market.btcusdt.trade.detail"));

    stream.close().await.unwrap();
    shutdown.cancel();
    dispatch.await.unwrap();
}

#[tokio::test]
async fn test_second_connect_rejected_before_handshake() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
    });

    let stream = MarketStream::new();
    stream.connect(&format!("ws://{addr}/ws")).await.unwrap();

    // Port 1 refuses connections; only a pre-handshake check yields this error.
    let err = stream.connect("ws://127.0.0.1:1/ws").await.unwrap_err();
    match err {
        HuobiError::WebSocket(message) => assert_eq!(message, "already connected"),
        other => panic!("Unexpected error: {other:?}"),
    }
    assert!(stream.is_connected().await);

    stream.close().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should see the close")
        .unwrap();
}

