// src/collect/mortality.rs

use std::collections::BTreeMap;

use reqwest::Client;
use tracing::info;

use crate::error::ScrapeError;
use crate::headers;
use crate::table::{self, Frame};

/// Live mortality tracker, one table per reporting period.
static MORTALITY_URL: &str = "https://ntca.gov.in/tiger-mortality/#mortality-details-2021";

/// All reporting periods flattened into one collection.
///
/// The site publishes each period with its own column set, so records are
/// maps rather than fixed-shape rows; `columns` is the union of every
/// period's headers in first-encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MortalityReport {
    pub columns: Vec<String>,
    pub records: Vec<BTreeMap<String, String>>,
}

/// Fetch the tiger mortality records the NTCA live-tracks.
pub async fn fetch_mortality(client: &Client) -> Result<MortalityReport, ScrapeError> {
    collect_mortality(client, MORTALITY_URL).await
}

/// URL-parameterized body of [`fetch_mortality`].
pub async fn collect_mortality(client: &Client, url: &str) -> Result<MortalityReport, ScrapeError> {
    let html = super::get_html(client, url, headers::profile(headers::NTCA_GOVT_IN)).await?;
    let mut frames = table::extract_all(&html);
    if frames.is_empty() {
        return Err(ScrapeError::Parse(
            "no <table> elements on mortality page".to_string(),
        ));
    }

    // Each period table carries its header as its first data row.
    for frame in &mut frames {
        frame.promote_header()?;
        if frame.is_empty() {
            return Err(ScrapeError::Parse(
                "mortality table has no data rows after header promotion".to_string(),
            ));
        }
    }

    let report = merge_frames(&frames);
    info!(
        rows = report.records.len(),
        columns = report.columns.len(),
        "collected tiger mortality records"
    );
    Ok(report)
}

/// Align frames by column name into one report: columns are the union in
/// first-encounter order, rows are re-indexed contiguously, and a row simply
/// lacks entries for columns its source table did not have.
pub fn merge_frames(frames: &[Frame]) -> MortalityReport {
    let mut columns: Vec<String> = Vec::new();
    for frame in frames {
        for column in &frame.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }

    let mut records = Vec::new();
    for frame in frames {
        for row in &frame.rows {
            let mut record = BTreeMap::new();
            for (i, column) in frame.columns.iter().enumerate() {
                if let Some(value) = row.get(i) {
                    record.insert(column.clone(), value.clone());
                }
            }
            records.push(record);
        }
    }

    MortalityReport { columns, records }
}
