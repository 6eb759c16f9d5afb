/*
[INPUT]:  (topic, payload) pairs from the market stream
[OUTPUT]: Decoded payloads delivered to per-topic listener callbacks
[POS]:    WebSocket layer - topic routing decoupled from the connection
[UPDATE]: When changing registration policy or dispatch semantics
*/

//! Topic-keyed routing of stream messages.
//!
//! Each topic holds exactly one listener; registering again for the same
//! topic replaces the previous one. Listeners are never removed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::message::{MarketDepth, StreamMessage, TradeDetail, depth_topic, topic_symbol, trade_detail_topic};

type Route = Arc<dyn Fn(&str, &str) -> Result<(), serde_json::Error> + Send + Sync>;

/// Result of routing one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// No listener for the topic; the message was dropped
    Unrouted,
    /// Payload did not decode into the listener's type; the message was dropped
    Malformed,
}

#[derive(Default)]
pub struct SubscriptionDispatcher {
    routes: RwLock<HashMap<String, Route>>,
}

impl std::fmt::Debug for SubscriptionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionDispatcher")
            .field("topics", &self.topics())
            .finish()
    }
}

impl SubscriptionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `topic`, replacing any earlier listener.
    ///
    /// Payloads are decoded into `T` before the listener is called with the
    /// topic's symbol segment.
    pub fn register_listener<T, F>(&self, topic: impl Into<String>, listener: F)
    where
        T: DeserializeOwned + 'static,
        F: Fn(&str, T) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let route: Route = Arc::new(move |symbol: &str, payload: &str| {
            let decoded = serde_json::from_str::<T>(payload)?;
            listener(symbol, decoded);
            Ok(())
        });

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        if routes.insert(topic.clone(), route).is_some() {
            debug!(topic = %topic, "listener replaced");
        }
    }

    pub fn register_trade_detail<F>(&self, symbol: &str, listener: F)
    where
        F: Fn(&str, TradeDetail) + Send + Sync + 'static,
    {
        self.register_listener(trade_detail_topic(symbol), listener);
    }

    pub fn register_depth<F>(&self, symbol: &str, listener: F)
    where
        F: Fn(&str, MarketDepth) + Send + Sync + 'static,
    {
        self.register_listener(depth_topic(symbol), listener);
    }

    pub fn is_registered(&self, topic: &str) -> bool {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(topic)
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        topics.sort();
        topics
    }

    /// Route one message to its listener.
    ///
    /// The listener runs on the caller's task; the route lock is released
    /// before it is invoked so listeners may register further topics.
    pub fn on_message(&self, topic: &str, payload: &str) -> DispatchOutcome {
        let route = {
            let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
            routes.get(topic).cloned()
        };

        let Some(route) = route else {
            trace!(topic, "no listener for topic");
            return DispatchOutcome::Unrouted;
        };

        let symbol = topic_symbol(topic).unwrap_or_default();
        match route(symbol, payload) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(err) => {
                warn!(topic, error = %err, bytes = payload.len(), "stream payload decode failed");
                DispatchOutcome::Malformed
            }
        }
    }

    pub fn dispatch(&self, message: &StreamMessage) -> DispatchOutcome {
        self.on_message(&message.topic, &message.payload)
    }
}

/// Drain `receiver` into `dispatcher` until the channel closes or `shutdown` fires.
pub fn spawn_dispatch_loop(
    mut receiver: mpsc::Receiver<StreamMessage>,
    dispatcher: Arc<SubscriptionDispatcher>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("dispatch loop cancelled");
                    break;
                }
                message = receiver.recv() => {
                    match message {
                        Some(message) => {
                            dispatcher.dispatch(&message);
                        }
                        None => {
                            debug!("stream channel closed; dispatch loop exiting");
                            break;
                        }
                    }
                }
            }
        }
    })
}
