/*
[INPUT]:  Market stream configuration and subscription topics
[OUTPUT]: Real-time trade ticks and depth snapshots routed to listeners
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod client;
pub mod dispatcher;
pub mod message;

pub use client::{MarketStream, MarketTransport};
pub use dispatcher::{DispatchOutcome, SubscriptionDispatcher, spawn_dispatch_loop};
pub use message::{
    DepthTick, Frame, MarketDepth, StreamMessage, TradeDetail, TradeDetailTick, TradeTick,
    depth_topic, topic_symbol, trade_detail_topic,
};
