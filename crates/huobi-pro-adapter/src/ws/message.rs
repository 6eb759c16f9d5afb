/*
[INPUT]:  Raw WebSocket frames (gzip-compressed JSON)
[OUTPUT]: Classified frames, topic helpers and typed market payloads
[POS]:    WebSocket layer - message parsing and validation
[UPDATE]: When adding new message types or changing format
*/

use std::fmt;
use std::io::Read;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::http::Result;
use crate::types::Direction;

pub const TRADE_DETAIL_CHANNEL: &str = "trade.detail";
pub const DEPTH_STEP0_CHANNEL: &str = "depth.step0";

pub fn trade_detail_topic(symbol: &str) -> String {
    format!("market.{symbol}.{TRADE_DETAIL_CHANNEL}")
}

pub fn depth_topic(symbol: &str) -> String {
    format!("market.{symbol}.{DEPTH_STEP0_CHANNEL}")
}

/// Symbol segment of a `market.<symbol>.<channel>` topic
pub fn topic_symbol(topic: &str) -> Option<&str> {
    topic.split('.').nth(1)
}

/// A routed data message: the topic and the full JSON text it arrived in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub topic: String,
    pub payload: String,
}

/// Trade ticks for one symbol
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TradeDetail {
    pub ch: String,
    #[serde(default)]
    pub ts: i64,
    pub tick: TradeDetailTick,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TradeDetailTick {
    #[serde(default)]
    pub ts: i64,
    pub data: Vec<TradeTick>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TradeTick {
    pub amount: f64,
    pub direction: Direction,
    pub price: f64,
    pub ts: i64,
    #[serde(rename = "tradeId", default)]
    pub trade_id: i64,
}

impl TradeDetail {
    /// Most recent tick of the batch
    pub fn latest(&self) -> Option<&TradeTick> {
        self.tick.data.first()
    }
}

impl fmt::Display for TradeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.latest() {
            Some(tick) => write!(
                f,
                "{} price: {} amount: {} direction: {:?}",
                self.ch, tick.price, tick.amount, tick.direction
            ),
            None => write!(f, "{} (no trades)", self.ch),
        }
    }
}

/// Order-book snapshot for one symbol
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarketDepth {
    pub ch: String,
    #[serde(default)]
    pub ts: i64,
    pub tick: DepthTick,
}

/// Price levels as `[price, quantity]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DepthTick {
    pub asks: Vec<[f64; 2]>,
    pub bids: Vec<[f64; 2]>,
    #[serde(default)]
    pub ts: i64,
    #[serde(default)]
    pub version: i64,
}

impl DepthTick {
    pub fn best_bid(&self) -> Option<[f64; 2]> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<[f64; 2]> {
        self.asks.first().copied()
    }
}

/// What an inbound frame means to the connection
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Server heartbeat; must be answered with the same value as `pong`
    Ping(i64),
    Data(StreamMessage),
    Subscribed { topic: String },
    Unsubscribed { topic: String },
    Rejected { code: String, message: String },
    Other,
}

/// Inflate a gzip-compressed binary frame into text
pub fn inflate(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

pub fn classify(text: &str) -> Frame {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Frame::Other;
    };

    if let Some(ping) = value.get("ping").and_then(|v| v.as_i64()) {
        return Frame::Ping(ping);
    }
    if let Some(topic) = value.get("ch").and_then(|v| v.as_str()) {
        return Frame::Data(StreamMessage {
            topic: topic.to_string(),
            payload: text.to_string(),
        });
    }

    let status = value.get("status").and_then(|v| v.as_str());
    if status == Some("error") {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        return Frame::Rejected {
            code: field("err-code"),
            message: field("err-msg"),
        };
    }
    if let Some(topic) = value.get("subbed").and_then(|v| v.as_str()) {
        return Frame::Subscribed {
            topic: topic.to_string(),
        };
    }
    if let Some(topic) = value.get("unsubbed").and_then(|v| v.as_str()) {
        return Frame::Unsubscribed {
            topic: topic.to_string(),
        };
    }

    Frame::Other
}
