// src/collect/reserves.rs

use std::collections::BTreeMap;

use reqwest::Client;
use tracing::info;

use crate::error::ScrapeError;
use crate::headers;
use crate::table;

/// Published reserve listing, anchored to the reserves tab of the page.
static RESERVE_URL: &str = "https://ntca.gov.in/tiger-reserves/#tiger-reserves-2";

/// Class signature of the one table on the page that holds the listing.
static RESERVE_TABLE_CLASS: &str =
    "sanctions-table table table-striped table-bordered table-responsive";

static NAME_COLUMN: &str = "Tiger Reserve";
static STATE_COLUMN: &str = "State";

/// One government-designated tiger protection area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reserve {
    pub name: String,
    pub state: String,
    /// Remaining scraped columns, keyed by header name.
    pub details: BTreeMap<String, String>,
}

/// Fetch the list of tiger reserves in India from the NTCA website.
pub async fn fetch_reserves(client: &Client) -> Result<Vec<Reserve>, ScrapeError> {
    collect_reserves(client, RESERVE_URL).await
}

/// URL-parameterized body of [`fetch_reserves`].
pub async fn collect_reserves(client: &Client, url: &str) -> Result<Vec<Reserve>, ScrapeError> {
    let html = super::get_html(client, url, headers::profile(headers::NTCA_GOVT_IN)).await?;
    let mut frame = table::extract_by_class(&html, RESERVE_TABLE_CLASS)?;
    if frame.columns.is_empty() {
        frame.promote_header()?;
    }

    // The site misspells one state and uses the post-rename form of another.
    frame.replace_in_column(STATE_COLUMN, "Madhy Pradesh", "Madhya Pradesh")?;
    frame.replace_in_column(STATE_COLUMN, "Odisha", "Orissa")?;

    // The last row is the total area across reserves, not a reserve.
    frame.drop_last_row();

    let name_idx = frame
        .column_index(NAME_COLUMN)
        .ok_or_else(|| ScrapeError::Parse(format!("missing \"{}\" column", NAME_COLUMN)))?;
    let state_idx = frame
        .column_index(STATE_COLUMN)
        .ok_or_else(|| ScrapeError::Parse(format!("missing \"{}\" column", STATE_COLUMN)))?;

    let reserves: Vec<Reserve> = frame
        .rows
        .iter()
        .map(|row| {
            let mut details = BTreeMap::new();
            for (i, column) in frame.columns.iter().enumerate() {
                if i == name_idx || i == state_idx {
                    continue;
                }
                if let Some(value) = row.get(i) {
                    details.insert(column.clone(), value.clone());
                }
            }
            Reserve {
                name: row.get(name_idx).cloned().unwrap_or_default(),
                state: row.get(state_idx).cloned().unwrap_or_default(),
                details,
            }
        })
        .collect();

    info!(count = reserves.len(), "collected tiger reserves");
    Ok(reserves)
}
