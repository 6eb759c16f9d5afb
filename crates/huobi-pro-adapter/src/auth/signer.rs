/*
[INPUT]:  HTTP method, host, path, parameter map and secret key
[OUTPUT]: Base64-encoded HMAC-SHA256 request signatures
[POS]:    Auth layer - signature version 2 for authenticated REST calls
[UPDATE]: When changing signing algorithm or signed payload format
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::canonical::{ParamMap, canonical_query};

type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_KEY_ID: &str = "AccessKeyId";
pub const SIGNATURE_METHOD: &str = "SignatureMethod";
pub const SIGNATURE_VERSION: &str = "SignatureVersion";
pub const TIMESTAMP: &str = "Timestamp";
pub const SIGNATURE: &str = "Signature";

pub const HMAC_SHA256: &str = "HmacSHA256";
pub const VERSION_2: &str = "2";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Build the string that gets signed: `method\nhost\npath\ncanonical_query`.
pub fn signing_payload(method: &str, host: &str, path: &str, params: &ParamMap) -> String {
    format!("{method}\n{host}\n{path}\n{}", canonical_query(params))
}

/// Sign a request.
///
/// `params` must not contain the `Signature` field itself; the caller adds
/// it afterwards. The secret never appears in the output.
pub fn sign(method: &str, host: &str, path: &str, params: &ParamMap, secret: &str) -> String {
    let payload = signing_payload(method, host, path, params);
    hmac_sha256_base64(&payload, secret)
}

fn hmac_sha256_base64(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Current UTC time at second precision, without timezone suffix.
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// The four authentication fields every signed request carries.
pub fn auth_params(access_key: &str, timestamp: &str) -> ParamMap {
    let mut params = ParamMap::new();
    params.insert(ACCESS_KEY_ID.to_string(), access_key.to_string());
    params.insert(SIGNATURE_METHOD.to_string(), HMAC_SHA256.to_string());
    params.insert(SIGNATURE_VERSION.to_string(), VERSION_2.to_string());
    params.insert(TIMESTAMP.to_string(), timestamp.to_string());
    params
}
