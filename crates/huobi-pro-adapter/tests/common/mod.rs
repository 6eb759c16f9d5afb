/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for huobi-pro-adapter tests

use huobi_pro_adapter::{ClientConfig, Credentials, HuobiClient, ParamMap, sign};
use wiremock::{Match, MockServer, Request};

pub const TEST_ACCESS_KEY: &str = "test-access-key";
pub const TEST_SECRET_KEY: &str = "test-secret-key";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY)
}

/// Signed client pointed at the mock server
pub fn signed_client(server: &MockServer) -> HuobiClient {
    let config = ClientConfig {
        rest_url: server.uri(),
        ..ClientConfig::default()
    };
    HuobiClient::with_config(config)
        .expect("client should build")
        .with_credentials(test_credentials())
}

/// Host the client signs with for a mock server (`ip:port`)
pub fn signing_host(server: &MockServer) -> String {
    let address = server.address();
    format!("{}:{}", address.ip(), address.port())
}

/// Matches requests whose `Signature` verifies against the received query.
///
/// Recomputes the HMAC the way the exchange does: every query field except
/// `Signature` is signed together with method, host and path.
pub struct ValidSignature {
    pub host: String,
    pub secret: String,
}

impl ValidSignature {
    pub fn for_server(server: &MockServer) -> Self {
        Self {
            host: signing_host(server),
            secret: TEST_SECRET_KEY.to_string(),
        }
    }
}

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        let mut params: ParamMap = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let Some(received) = params.remove("Signature") else {
            return false;
        };

        let expected = sign(
            request.method.as_str(),
            &self.host,
            request.url.path(),
            &params,
            &self.secret,
        );
        expected == received
    }
}
