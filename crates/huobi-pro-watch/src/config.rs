/*
[INPUT]:  YAML configuration file
[OUTPUT]: Validated watch configuration and adapter client settings
[POS]:    Configuration layer - watcher setup
[UPDATE]: When adding new configuration options
*/

use std::fmt;
use std::time::Duration;

use anyhow::{Context, bail};
use huobi_pro_adapter::{ClientConfig, Credentials};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the market watcher
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// API keys; without them only market data is watched
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
    /// Symbols to subscribe (e.g., "btcusdt")
    pub symbols: Vec<String>,
    /// Subscribe to `market.<symbol>.trade.detail`
    #[serde(default = "default_enabled")]
    pub trade_detail: bool,
    /// Subscribe to `market.<symbol>.depth.step0`
    #[serde(default = "default_enabled")]
    pub depth: bool,
    /// REST base URL override
    #[serde(default)]
    pub rest_url: Option<String>,
    /// Market stream URL override
    #[serde(default)]
    pub ws_url: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// API key pair as written in the config file
#[derive(Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

fn default_enabled() -> bool {
    true
}

impl WatchConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.symbols.is_empty() {
            bail!("at least one symbol is required");
        }
        for symbol in &self.symbols {
            // The symbol is the second dot-separated segment of a topic.
            if symbol.is_empty() || symbol.contains('.') || symbol.contains(char::is_whitespace) {
                bail!("invalid symbol {symbol:?}");
            }
        }
        if !self.trade_detail && !self.depth {
            bail!("enable trade_detail or depth");
        }
        if let Some(credentials) = &self.credentials {
            if credentials.access_key.is_empty() != credentials.secret_key.is_empty() {
                bail!("credentials need both access_key and secret_key, or neither");
            }
        }
        Ok(())
    }

    /// Credentials usable for signing, if both keys are set
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .as_ref()
            .filter(|c| !c.access_key.is_empty() && !c.secret_key.is_empty())
            .map(|c| Credentials::new(c.access_key.clone(), c.secret_key.clone()))
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(rest_url) = &self.rest_url {
            config.rest_url = rest_url.clone();
        }
        if let Some(ws_url) = &self.ws_url {
            config.ws_url = ws_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn symbol_refs(&self) -> Vec<&str> {
        self.symbols.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huobi_pro_adapter::{MARKET_STREAM_URL, REST_BASE_URL};

    #[test]
    fn test_minimal_config_defaults() {
        let config = WatchConfig::from_yaml("symbols: [btcusdt]\n").unwrap();
        assert!(config.trade_detail);
        assert!(config.depth);
        assert!(config.credentials().is_none());

        let client = config.client_config();
        assert_eq!(client.rest_url, REST_BASE_URL);
        assert_eq!(client.ws_url, MARKET_STREAM_URL);
    }

    #[test]
    fn test_overrides_applied() {
        let config = WatchConfig::from_yaml(
            "symbols: [ethusdt]\nrest_url: http://127.0.0.1:9000\nws_url: ws://127.0.0.1:9001/ws\ntimeout_secs: 5\ndepth: false\n",
        )
        .unwrap();
        let client = config.client_config();
        assert_eq!(client.rest_url, "http://127.0.0.1:9000");
        assert_eq!(client.ws_url, "ws://127.0.0.1:9001/ws");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert!(!config.depth);
    }

    #[test]
    fn test_credentials_both_or_neither() {
        let half = "symbols: [btcusdt]\ncredentials:\n  access_key: ak\n  secret_key: \"\"\n";
        assert!(WatchConfig::from_yaml(half).is_err());

        let empty = "symbols: [btcusdt]\ncredentials:\n  access_key: \"\"\n  secret_key: \"\"\n";
        let config = WatchConfig::from_yaml(empty).unwrap();
        assert!(config.credentials().is_none());

        let full = "symbols: [btcusdt]\ncredentials:\n  access_key: ak\n  secret_key: sk\n";
        let credentials = WatchConfig::from_yaml(full).unwrap().credentials().unwrap();
        assert_eq!(credentials, Credentials::new("ak", "sk"));
    }

    #[test]
    fn test_rejects_bad_symbols_and_empty_feeds() {
        assert!(WatchConfig::from_yaml("symbols: []\n").is_err());
        assert!(WatchConfig::from_yaml("symbols: [\"btc.usdt\"]\n").is_err());
        assert!(WatchConfig::from_yaml("symbols: [btcusdt]\ntrade_detail: false\ndepth: false\n").is_err());
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let full = "symbols: [btcusdt]\ncredentials:\n  access_key: ak\n  secret_key: hunter2\n";
        let config = WatchConfig::from_yaml(full).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
