/*
[INPUT]:  Raw REST response bodies
[OUTPUT]: Typed `data` payloads or remote errors
[POS]:    Data layer - the status/data/err-code/err-msg envelope
[UPDATE]: When the response envelope changes
*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::http::{HuobiError, Result};

pub const STATUS_OK: &str = "ok";

/// Envelope wrapping every REST response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(rename = "err-code")]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg")]
    pub err_msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Return `data` on success, the remote error otherwise.
    pub fn into_result(self) -> Result<T> {
        if !self.is_ok() {
            return Err(HuobiError::api_error(
                self.err_code.unwrap_or_default(),
                self.err_msg.unwrap_or_default(),
            ));
        }
        self.data
            .ok_or_else(|| HuobiError::InvalidResponse("ok status without data".to_string()))
    }
}

/// Decode a response body into its envelope and unwrap `data`.
///
/// Bodies that are not a JSON envelope (gateway pages, plain error text)
/// become `InvalidResponse` rather than a serialization error.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| HuobiError::invalid_body(body))?;
    if value.get("status").and_then(|status| status.as_str()).is_none() {
        return Err(HuobiError::invalid_body(body));
    }
    let envelope: ApiResponse<T> = serde_json::from_value(value)?;
    envelope.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_returns_data() {
        let data: String = decode_envelope(r#"{"status":"ok","data":"59378"}"#).unwrap();
        assert_eq!(data, "59378");
    }

    #[test]
    fn test_error_envelope_carries_remote_message() {
        let err = decode_envelope::<String>(
            r#"{"status":"error","err-code":"order-limitorder-amount-min-error","err-msg":"limit order amount error","data":null}"#,
        )
        .unwrap_err();

        match err {
            HuobiError::Api { code, message } => {
                assert_eq!(code, "order-limitorder-amount-min-error");
                assert_eq!(message, "limit order amount error");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_body_is_invalid_response() {
        let err = decode_envelope::<String>("dial tcp: lookup api.huobi.pro: no such host").unwrap_err();
        assert!(matches!(err, HuobiError::InvalidResponse(text) if text.starts_with("dial tcp")));
    }

    #[test]
    fn test_json_without_status_is_invalid_response() {
        let err = decode_envelope::<String>(r#"{"message":"bad gateway"}"#).unwrap_err();
        assert!(matches!(err, HuobiError::InvalidResponse(_)));
    }

    #[test]
    fn test_ok_without_data_is_invalid_response() {
        let err = decode_envelope::<String>(r#"{"status":"ok"}"#).unwrap_err();
        assert!(matches!(err, HuobiError::InvalidResponse(_)));
    }

    #[test]
    fn test_mistyped_data_is_serialization_error() {
        let err = decode_envelope::<i64>(r#"{"status":"ok","data":"abc"}"#).unwrap_err();
        assert!(matches!(err, HuobiError::Serialization(_)));
    }
}
