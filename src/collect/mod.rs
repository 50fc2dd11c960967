// src/collect/mod.rs

pub mod mortality;
pub mod occurrence;
pub mod reserves;

pub use mortality::{fetch_mortality, MortalityReport};
pub use occurrence::{fetch_occurrences, Occurrence};
pub use reserves::{fetch_reserves, Reserve};

use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ScrapeError;

/// One GET with an optional header profile, failing on transport errors and
/// non-2xx statuses alike.
pub(crate) async fn get_html(
    client: &Client,
    url: &str,
    profile: Option<&HeaderMap>,
) -> Result<String, ScrapeError> {
    let url = Url::parse(url)
        .map_err(|e| ScrapeError::Parse(format!("invalid url {}: {}", url, e)))?;
    debug!(%url, "fetching page");
    let mut request = client.get(url);
    if let Some(headers) = profile {
        request = request.headers(headers.clone());
    }
    let body = request.send().await?.error_for_status()?.text().await?;
    Ok(body)
}
