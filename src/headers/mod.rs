// src/headers/mod.rs

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Source identifier for the NTCA government site.
pub const NTCA_GOVT_IN: &str = "ntca_govt_in";

/// The NTCA site rejects bare library requests, so its profile mirrors a
/// desktop Firefox navigation request.
static NTCA_FIELDS: &[(&str, &str)] = &[
    ("host", "ntca.gov.in"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; rv:102.0) Gecko/20100101 Firefox/102.0",
    ),
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.5"),
    ("accept-encoding", "gzip, deflate, br"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
];

static PROFILES: Lazy<HashMap<&'static str, HeaderMap>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(NTCA_GOVT_IN, build(NTCA_FIELDS));
    map
});

fn build(fields: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(fields.len());
    for &(name, value) in fields {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Look up the header profile for a source identifier. Returns `None` for
/// any identifier without a defined profile.
pub fn profile(source: &str) -> Option<&'static HeaderMap> {
    PROFILES.get(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_source_returns_full_field_set() {
        let headers = profile(NTCA_GOVT_IN).expect("profile should exist");
        assert_eq!(headers.len(), NTCA_FIELDS.len());
        assert_eq!(headers.get("host").unwrap(), "ntca.gov.in");
        assert_eq!(
            headers.get("user-agent").unwrap(),
            "Mozilla/5.0 (Windows NT 10.0; rv:102.0) Gecko/20100101 Firefox/102.0"
        );
        assert_eq!(headers.get("sec-fetch-user").unwrap(), "?1");
    }

    #[test]
    fn unknown_source_returns_none() {
        assert!(profile("gbif_org").is_none());
        assert!(profile("").is_none());
    }
}
