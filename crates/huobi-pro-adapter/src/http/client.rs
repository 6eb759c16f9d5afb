/*
[INPUT]:  HTTP configuration (base URLs, timeouts, credentials)
[OUTPUT]: Signed GET/POST requests and raw response bodies
[POS]:    HTTP layer - authenticated request issuer
[UPDATE]: When adding connection options or changing signing flow
*/

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{ParamMap, auth_params, canonical_query, sign, timestamp_now};
use crate::auth::signer::SIGNATURE;
use crate::http::{HuobiError, Result};
use crate::types::decode_envelope;

/// Base URLs for Huobi API
pub const REST_BASE_URL: &str = "https://api.huobi.pro";
pub const MARKET_STREAM_URL: &str = "wss://api.huobi.pro/ws";

const USER_AGENT: &str = concat!("huobi-pro-adapter/", env!("CARGO_PKG_VERSION"));

/// HTTP and stream endpoint configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rest_url: String,
    pub ws_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: REST_BASE_URL.to_string(),
            ws_url: MARKET_STREAM_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// API key pair. The secret only feeds the HMAC and is never sent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Main HTTP client for Huobi REST API
#[derive(Debug, Clone)]
pub struct HuobiClient {
    http_client: Client,
    base_url: Url,
    host: String,
    credentials: Option<Credentials>,
}

impl HuobiClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = Url::parse(&config.rest_url)?;
        let host = signing_host(&base_url)?;

        Ok(Self {
            http_client,
            base_url,
            host,
            credentials: None,
        })
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Host name the signature payload is built with
    pub fn host(&self) -> &str {
        &self.host
    }

    fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or(HuobiError::MissingCredentials)
    }

    fn endpoint_url(&self, path: &str, query: &str) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        // The query is already canonical and encoded; setting it verbatim
        // keeps the transmitted bytes identical to what was signed.
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// Build a signed GET URL.
    ///
    /// Business parameters are part of the signed query.
    pub fn signed_get_url(&self, path: &str, params: &ParamMap, timestamp: &str) -> Result<Url> {
        let credentials = self.require_credentials()?;

        let mut signed = params.clone();
        signed.extend(auth_params(&credentials.access_key, timestamp));
        let signature = sign(
            Method::GET.as_str(),
            &self.host,
            path,
            &signed,
            &credentials.secret_key,
        );
        signed.insert(SIGNATURE.to_string(), signature);

        self.endpoint_url(path, &canonical_query(&signed))
    }

    /// Build a signed POST URL.
    ///
    /// Only the authentication fields are signed; business parameters travel
    /// in the JSON body and are not part of the signature.
    pub fn signed_post_url(&self, path: &str, timestamp: &str) -> Result<Url> {
        let credentials = self.require_credentials()?;

        let mut signed = auth_params(&credentials.access_key, timestamp);
        let signature = sign(
            Method::POST.as_str(),
            &self.host,
            path,
            &signed,
            &credentials.secret_key,
        );
        signed.insert(SIGNATURE.to_string(), signature);

        self.endpoint_url(path, &canonical_query(&signed))
    }

    /// Issue a signed GET and return the body text verbatim
    pub async fn authenticated_get(&self, path: &str, params: &ParamMap) -> Result<String> {
        let url = self.signed_get_url(path, params, &timestamp_now())?;
        debug!(method = "GET", path, param_count = params.len(), "signed request");

        let builder = self.http_client.request(Method::GET, url);
        self.read_body(path, builder).await
    }

    /// Issue a signed POST with `params` as a JSON object body
    pub async fn authenticated_post(&self, path: &str, params: &ParamMap) -> Result<String> {
        let url = self.signed_post_url(path, &timestamp_now())?;
        let body = serde_json::to_string(params)?;
        debug!(method = "POST", path, param_count = params.len(), "signed request");

        let builder = self
            .http_client
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.read_body(path, builder).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &ParamMap) -> Result<T> {
        let body = self.authenticated_get(path, params).await?;
        decode_envelope(&body)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(&self, path: &str, params: &ParamMap) -> Result<T> {
        let body = self.authenticated_post(path, params).await?;
        decode_envelope(&body)
    }

    async fn read_body(&self, path: &str, builder: reqwest::RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // The envelope, when present, carries the actual reason.
            warn!(path, status = status.as_u16(), bytes = body.len(), "non-success HTTP status");
        }
        Ok(body)
    }
}

/// Host part of the signature payload: host name plus an explicit port.
fn signing_host(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| HuobiError::Config(format!("REST url has no host: {url}")))?
        .to_ascii_lowercase();
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
