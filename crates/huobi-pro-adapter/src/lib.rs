/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Huobi Pro adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod exchange;
pub mod http;
pub mod types;
pub mod ws;

// Re-export commonly used items from auth
pub use auth::{ParamMap, canonical_query, sign};

pub use exchange::{EXCHANGE_NAME, Huobi};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Credentials,
    HuobiClient,
    HuobiError,
    MARKET_STREAM_URL,
    REST_BASE_URL,
    Result,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    DispatchOutcome,
    MarketDepth,
    MarketStream,
    MarketTransport,
    StreamMessage,
    SubscriptionDispatcher,
    TradeDetail,
};
