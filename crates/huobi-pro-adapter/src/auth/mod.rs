/*
[INPUT]:  Request parameters and API credentials
[OUTPUT]: Canonical query strings and request signatures
[POS]:    Auth layer - handles Huobi API request signing
[UPDATE]: When signature version or canonicalization changes
*/

pub mod canonical;
pub mod signer;

pub use canonical::{ParamMap, canonical_query, encode_value, encode_values, join_query};
pub use signer::{auth_params, sign, signing_payload, timestamp_now};
