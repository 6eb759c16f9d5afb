/*
[INPUT]:  Market stream URL and subscription topics
[OUTPUT]: (topic, payload) messages via channel; sub/unsub directives
[POS]:    WebSocket layer - raw market stream transport
[UPDATE]: When adding directives or changing connection logic
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::message::{Frame, StreamMessage, classify, inflate};
use crate::http::{HuobiError, MARKET_STREAM_URL, Result};

const CHANNEL_CAPACITY: usize = 1024;
const OUTBOUND_CAPACITY: usize = 100;
const SUBSCRIPTION_LOG_LIMIT: usize = 10;
const OTHER_LOG_LIMIT: usize = 3;
const DECODE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static SUBSCRIBE_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static OTHER_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static DECODE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Outbound side of a market stream, as used by the exchange facade
#[async_trait]
pub trait MarketTransport: Send + Sync {
    /// Ask the server to start pushing `topic`
    async fn subscribe(&self, topic: &str) -> Result<()>;

    /// Close the connection; further subscribes fail
    async fn close(&self) -> Result<()>;
}

/// WebSocket client for the public market stream
#[derive(Debug)]
pub struct MarketStream {
    message_tx: mpsc::Sender<StreamMessage>,
    message_rx: Option<mpsc::Receiver<StreamMessage>>,
    outbound_tx: Arc<Mutex<Option<mpsc::Sender<WsMessage>>>>,
}

impl MarketStream {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            message_tx: tx,
            message_rx: Some(rx),
            outbound_tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the message receiver; only the first call returns it
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<StreamMessage>> {
        self.message_rx.take()
    }

    pub async fn is_connected(&self) -> bool {
        self.outbound_tx.lock().await.is_some()
    }

    /// Connect to the default market stream
    pub async fn connect_market_stream(&self) -> Result<()> {
        self.connect(MARKET_STREAM_URL).await
    }

    /// Connect and spawn the reader/writer task.
    ///
    /// Data frames are pushed onto the channel returned by `take_receiver`;
    /// heartbeats are answered on the same task.
    pub async fn connect(&self, url: &str) -> Result<()> {
        if self.is_connected().await {
            return Err(HuobiError::WebSocket("already connected".to_string()));
        }

        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|err| HuobiError::WebSocket(err.to_string()))?;
        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let outbound_state = self.outbound_tx.clone();

        {
            let mut guard = outbound_state.lock().await;
            if guard.is_some() {
                return Err(HuobiError::WebSocket("already connected".to_string()));
            }
            *guard = Some(outbound_tx);
        }
        info!(url, "market stream connected");

        let message_tx = self.message_tx.clone();
        let outbound_state_for_task = outbound_state.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    break;
                                }
                            }
                            None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(WsMessage::Close(_))) => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                            Some(Ok(message)) => {
                                match Self::frame_from(message) {
                                    Some(Frame::Ping(value)) => {
                                        let pong = serde_json::json!({ "pong": value }).to_string();
                                        if write.send(WsMessage::Text(pong.into())).await.is_err() {
                                            break;
                                        }
                                    }
                                    Some(Frame::Data(message)) => {
                                        if message_tx.send(message).await.is_err() {
                                            break;
                                        }
                                    }
                                    Some(frame) => log_control_frame(&frame),
                                    None => {}
                                }
                            }
                            Some(Err(err)) => {
                                warn!(error = %err, "market stream read failed");
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }

            let mut guard = outbound_state_for_task.lock().await;
            *guard = None;
            info!("market stream closed");
        });

        Ok(())
    }

    /// Send a `sub` directive for `topic`
    pub async fn subscribe_topic(&self, topic: &str) -> Result<()> {
        let msg = serde_json::json!({
            "sub": topic,
            "id": Uuid::new_v4().to_string(),
        });
        self.send_directive(msg).await
    }

    /// Send an `unsub` directive for `topic`
    pub async fn unsubscribe_topic(&self, topic: &str) -> Result<()> {
        let msg = serde_json::json!({
            "unsub": topic,
            "id": Uuid::new_v4().to_string(),
        });
        self.send_directive(msg).await
    }

    /// Drop the outbound sender; the connection task closes the socket
    pub async fn disconnect(&self) {
        let mut guard = self.outbound_tx.lock().await;
        *guard = None;
    }

    async fn send_directive(&self, message: serde_json::Value) -> Result<()> {
        let sender = {
            let guard = self.outbound_tx.lock().await;
            guard.clone().ok_or(HuobiError::NotConnected)?
        };

        sender
            .send(WsMessage::Text(message.to_string().into()))
            .await
            .map_err(|_| HuobiError::WebSocket("send channel closed".to_string()))?;

        log_directive_sent(&message);

        Ok(())
    }

    fn frame_from(message: WsMessage) -> Option<Frame> {
        let text = match message {
            WsMessage::Binary(bytes) => match inflate(&bytes) {
                Ok(text) => text,
                Err(err) => {
                    log_decode_fail_once(&err, bytes.len());
                    return None;
                }
            },
            WsMessage::Text(text) => text.to_string(),
            _ => return None,
        };

        let frame = classify(&text);
        if frame == Frame::Other {
            log_other_message_once(&text);
        }
        Some(frame)
    }
}

impl Default for MarketStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketTransport for MarketStream {
    async fn subscribe(&self, topic: &str) -> Result<()> {
        self.subscribe_topic(topic).await
    }

    async fn close(&self) -> Result<()> {
        self.disconnect().await;
        Ok(())
    }
}

fn log_control_frame(frame: &Frame) {
    match frame {
        Frame::Subscribed { topic } => info!(topic = %topic, "ws subscription confirmed"),
        Frame::Unsubscribed { topic } => info!(topic = %topic, "ws unsubscription confirmed"),
        Frame::Rejected { code, message } => {
            warn!(code = %code, message = %message, "ws request rejected")
        }
        _ => {}
    }
}

fn log_directive_sent(message: &serde_json::Value) {
    let count = SUBSCRIBE_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count >= SUBSCRIPTION_LOG_LIMIT {
        return;
    }

    if let Some((action, topic)) = describe_directive(message) {
        info!(
            sample_index = count + 1,
            sample_limit = SUBSCRIPTION_LOG_LIMIT,
            action,
            topic,
            "ws directive sent"
        );
        return;
    }

    let preview = truncate_for_log(&message.to_string(), RAW_LOG_MAX_BYTES);
    info!(
        sample_index = count + 1,
        sample_limit = SUBSCRIPTION_LOG_LIMIT,
        message = %preview,
        "ws directive sent"
    );
}

fn describe_directive(message: &serde_json::Value) -> Option<(&'static str, &str)> {
    if let Some(topic) = message.get("sub").and_then(|value| value.as_str()) {
        return Some(("subscribe", topic));
    }
    let topic = message.get("unsub")?.as_str()?;
    Some(("unsubscribe", topic))
}

fn log_other_message_once(raw: &str) {
    let count = OTHER_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < OTHER_LOG_LIMIT {
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = OTHER_LOG_LIMIT,
            bytes = raw.len(),
            message = %preview,
            "ws frame unrecognized"
        );
    }
}

fn log_decode_fail_once(err: &HuobiError, bytes: usize) {
    let count = DECODE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < DECODE_FAIL_LOG_LIMIT {
        warn!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            error = %err,
            bytes,
            "ws frame inflate failed"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
