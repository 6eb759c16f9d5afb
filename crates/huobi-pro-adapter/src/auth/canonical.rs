/*
[INPUT]:  String-valued request parameter maps
[OUTPUT]: Canonical query strings (sorted keys, URI-encoded values)
[POS]:    Auth layer - shared serialization for signing and transmission
[UPDATE]: When the exchange changes its query canonicalization rules
*/

use std::collections::BTreeMap;

use url::form_urlencoded::byte_serialize;

/// Request parameters keyed by name.
///
/// A `BTreeMap` iterates in byte order of its keys, which is exactly the
/// ASCII ordering the exchange signs over.
pub type ParamMap = BTreeMap<String, String>;

/// URI-encode a single parameter value with query escaping rules.
///
/// Unreserved characters are `A-Z a-z 0-9 - _ . ~`, space becomes `+`, and
/// every other byte is `%XX`. The form encoder keeps `*` and escapes `~`,
/// so those two are swapped back to match what the exchange recomputes.
pub fn encode_value(value: &str) -> String {
    let encoded: String = byte_serialize(value.as_bytes()).collect();
    encoded.replace('*', "%2A").replace("%7E", "~")
}

/// Return a copy of `params` with every value URI-encoded. Keys are untouched.
pub fn encode_values(params: &ParamMap) -> ParamMap {
    params
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Join already-encoded parameters as `key=value` pairs separated by `&`.
pub fn join_query(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical query string for `params`.
///
/// Keys are sorted by byte order, values are URI-encoded, pairs are joined
/// with `&`. An empty map yields an empty string.
pub fn canonical_query(params: &ParamMap) -> String {
    join_query(&encode_values(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_map_is_empty_string() {
        assert_eq!(canonical_query(&ParamMap::new()), "");
    }

    #[test]
    fn test_keys_sorted_by_ascii() {
        let map = params(&[
            ("type", "buy-limit"),
            ("Timestamp", "x"),
            ("symbol", "btcusdt"),
            ("AccessKeyId", "k"),
        ]);
        assert_eq!(
            canonical_query(&map),
            "AccessKeyId=k&Timestamp=x&symbol=btcusdt&type=buy-limit"
        );
    }

    #[rstest]
    #[case("2024-01-02T03:04:05", "2024-01-02T03%3A04%3A05")]
    #[case("a+b/c=", "a%2Bb%2Fc%3D")]
    #[case("two words", "two+words")]
    #[case("btcusdt", "btcusdt")]
    #[case("submitted,filled", "submitted%2Cfilled")]
    #[case("a~b", "a~b")]
    #[case("a*b", "a%2Ab")]
    #[case("~*~", "~%2A~")]
    fn test_value_encoding(#[case] raw: &str, #[case] encoded: &str) {
        assert_eq!(encode_value(raw), encoded);
    }

    #[test]
    fn test_keys_are_not_encoded() {
        let map = params(&[("a:b", "c:d")]);
        assert_eq!(canonical_query(&map), "a:b=c%3Ad");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = params(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let backward = params(&[("c", "3"), ("b", "2"), ("a", "1")]);
        assert_eq!(canonical_query(&forward), canonical_query(&backward));
        assert_eq!(canonical_query(&forward), canonical_query(&forward));
    }

    #[test]
    fn test_reparsed_output_canonicalizes_identically() {
        let map = params(&[
            ("Timestamp", "2024-01-02T03:04:05"),
            ("symbol", "btc usdt"),
            ("states", "submitted,filled"),
        ]);
        let query = canonical_query(&map);

        let reparsed: ParamMap = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(reparsed, map);
        assert_eq!(canonical_query(&reparsed), query);
    }
}
