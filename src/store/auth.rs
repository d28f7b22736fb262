use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

use super::error::StoreError;

pub(super) const API_VERSION: &str = "2018-12-31";

/// Everything but RFC 3986 unreserved characters.
const TOKEN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

type HmacSha256 = Hmac<Sha256>;

/// RFC 1123 date as expected in `x-ms-date`.
pub(super) fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builds the url-encoded master key authorization header value.
///
/// The signed payload lowercases verb, resource type and date but keeps the
/// resource link as-is.
pub(super) fn master_key_token(
    master_key: &str,
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String, StoreError> {
    let key = STANDARD
        .decode(master_key.trim())
        .map_err(|error| StoreError::unavailable("authorize", format!("master key is not base64: {}", error)))?;

    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|error| StoreError::unavailable("authorize", error))?;
    mac.update(payload.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(percent_encode(&format!(
        "type=master&ver=1.0&sig={}",
        signature
    )))
}

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, TOKEN_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use chrono::{TimeZone, Utc};
    use percent_encoding::percent_decode_str;

    use super::{master_key_token, percent_encode, request_date};

    const KEY: &str = "c2VjcmV0LW1hc3Rlci1rZXktZm9yLXRlc3Rz";
    const DATE: &str = "Mon, 01 Jan 2024 11:00:00 GMT";

    #[test]
    fn request_date_is_rfc1123() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        assert_eq!(request_date(now), DATE);
    }

    #[test]
    fn token_is_deterministic_and_url_encoded() {
        let first = master_key_token(KEY, "POST", "docs", "dbs/Db/colls/Leituras", DATE)
            .expect("token");
        let second = master_key_token(KEY, "post", "DOCS", "dbs/Db/colls/Leituras", DATE)
            .expect("token");

        assert_eq!(first, second);
        assert!(first.starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
        assert!(!first.contains('+') && !first.contains('/') && !first.contains('='));

        let signature = first.trim_start_matches("type%3Dmaster%26ver%3D1.0%26sig%3D");
        let signature = percent_decode_str(signature)
            .decode_utf8()
            .expect("signature is utf-8");
        let raw = STANDARD.decode(signature.as_bytes()).expect("signature is base64");
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn resource_link_is_case_sensitive() {
        let lower = master_key_token(KEY, "POST", "docs", "dbs/db/colls/leituras", DATE)
            .expect("token");
        let mixed = master_key_token(KEY, "POST", "docs", "dbs/Db/colls/Leituras", DATE)
            .expect("token");
        assert_ne!(lower, mixed);
    }

    #[test]
    fn rejects_key_that_is_not_base64() {
        let error = master_key_token("not base64!", "POST", "docs", "dbs/a/colls/b", DATE)
            .expect_err("must fail");
        assert_eq!(error.code(), "STORE_UNAVAILABLE");
    }

    #[test]
    fn percent_encoding_keeps_unreserved_characters() {
        assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(percent_encode("a=b&c+/"), "a%3Db%26c%2B%2F");
        assert_eq!(percent_encode("sig é"), "sig%20%C3%A9");
    }
}
