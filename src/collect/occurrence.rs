// src/collect/occurrence.rs

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::ScrapeError;

/// GBIF occurrence search endpoint.
static GBIF_SEARCH_URL: &str = "https://www.gbif.org/api/occurrence/search";

/// iNaturalist research-grade observations.
static DATASET_KEY: &str = "50c9509d-22c7-4a22-a47d-8c48425ef4a7";

/// Bounding polygon covering India.
static GEOMETRY: &str = "POLYGON((68.1 6.5,97.4 6.5,97.4 35.7,68.1 35.7,68.1 6.5))";

/// The one species every collected record must carry.
pub static TAXON: &str = "Panthera tigris";

/// Documented maximum page size of the occurrence API.
pub const PAGE_LIMIT: u32 = 300;

/// Courtesy pause between successive pages. Not adaptive.
pub const PAGE_DELAY: Duration = Duration::from_secs(10);

/// Page ceiling for the fixed query (~300k records), so a misbehaving
/// end-of-records flag cannot spin the pager forever.
pub const MAX_PAGES: u32 = 1_000;

/// One geotagged observation from the biodiversity aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    #[serde(default)]
    pub key: Option<i64>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub decimal_latitude: Option<f64>,
    #[serde(default)]
    pub decimal_longitude: Option<f64>,
    #[serde(default, deserialize_with = "de_event_date")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub basis_of_record: Option<String>,
    /// Everything else the API returns for the record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the paginated search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    end_of_records: bool,
    #[serde(default)]
    results: Vec<Occurrence>,
}

/// Fetch every Panthera tigris occurrence for the fixed India query,
/// walking the paginated API to its end-of-records flag.
pub async fn fetch_occurrences(client: &Client) -> Result<Vec<Occurrence>, ScrapeError> {
    collect_occurrences(client, GBIF_SEARCH_URL, PAGE_DELAY, MAX_PAGES).await
}

/// Body of [`fetch_occurrences`] with the endpoint, inter-page delay and
/// page ceiling injectable.
pub async fn collect_occurrences(
    client: &Client,
    base_url: &str,
    page_delay: Duration,
    max_pages: u32,
) -> Result<Vec<Occurrence>, ScrapeError> {
    let mut occurrences: Vec<Occurrence> = Vec::new();
    let mut offset: u32 = 0;
    let mut pages: u32 = 0;

    loop {
        if pages >= max_pages {
            return Err(ScrapeError::DataInvariant(format!(
                "no end-of-records flag after {} pages (offset {})",
                pages, offset
            )));
        }
        let page = fetch_page(client, base_url, offset).await?;
        pages += 1;
        debug!(
            offset,
            results = page.results.len(),
            end_of_records = page.end_of_records,
            "fetched occurrence page"
        );
        occurrences.extend(page.results);
        if page.end_of_records {
            break;
        }
        offset += PAGE_LIMIT;
        sleep(page_delay).await;
    }

    check_species(&occurrences)?;
    info!(count = occurrences.len(), pages, "collected occurrences");
    Ok(occurrences)
}

async fn fetch_page(
    client: &Client,
    base_url: &str,
    offset: u32,
) -> Result<SearchPage, ScrapeError> {
    let base = url::Url::parse(base_url)
        .map_err(|e| ScrapeError::Parse(format!("invalid url {}: {}", base_url, e)))?;
    let limit = PAGE_LIMIT.to_string();
    let offset = offset.to_string();
    let body = client
        .get(base)
        .query(&[
            ("advanced", "false"),
            ("dataset_key", DATASET_KEY),
            ("geometry", GEOMETRY),
            ("has_coordinate", "true"),
            ("has_geospatial_issue", "false"),
            ("occurrence_status", "present"),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(serde_json::from_str(&body)?)
}

/// The fixed query targets a single taxon, so the set of distinct species
/// values across the collection must be exactly `{TAXON}`. A record without
/// a species field counts as its own observed value.
fn check_species(occurrences: &[Occurrence]) -> Result<(), ScrapeError> {
    let distinct: BTreeSet<&str> = occurrences
        .iter()
        .map(|o| o.species.as_deref().unwrap_or("<missing>"))
        .collect();
    if distinct.len() == 1 && distinct.contains(TAXON) {
        return Ok(());
    }
    let observed: Vec<&str> = distinct.into_iter().collect();
    Err(ScrapeError::DataInvariant(format!(
        "expected every record to be \"{}\", observed species set {{{}}}",
        TAXON,
        observed.join(", ")
    )))
}

/// The aggregator serves event dates in several shapes; anything
/// unrecognized is kept as a missing date rather than failing the record.
fn de_event_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_event_date))
}

fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(species: Option<&str>) -> Occurrence {
        Occurrence {
            key: Some(1),
            species: species.map(|s| s.to_string()),
            decimal_latitude: Some(23.8),
            decimal_longitude: Some(81.0),
            event_date: None,
            basis_of_record: Some("HUMAN_OBSERVATION".to_string()),
            extra: Map::new(),
        }
    }

    #[test]
    fn species_check_accepts_singleton_taxon() {
        let records = vec![occurrence(Some(TAXON)), occurrence(Some(TAXON))];
        assert!(check_species(&records).is_ok());
    }

    #[test]
    fn species_check_rejects_foreign_species() {
        let records = vec![occurrence(Some(TAXON)), occurrence(Some("Panthera pardus"))];
        let err = check_species(&records).unwrap_err();
        assert!(matches!(err, ScrapeError::DataInvariant(_)));
        assert!(err.to_string().contains("Panthera pardus"));
    }

    #[test]
    fn species_check_rejects_empty_and_missing() {
        let err = check_species(&[]).unwrap_err();
        assert!(matches!(err, ScrapeError::DataInvariant(_)));

        let err = check_species(&[occurrence(None)]).unwrap_err();
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn event_dates_parse_in_served_shapes() {
        assert_eq!(
            parse_event_date("2021-02-11T06:30:00Z"),
            Some(Utc.with_ymd_and_hms(2021, 2, 11, 6, 30, 0).unwrap())
        );
        assert_eq!(
            parse_event_date("2021-02-11T06:30:00"),
            Some(Utc.with_ymd_and_hms(2021, 2, 11, 6, 30, 0).unwrap())
        );
        assert_eq!(
            parse_event_date("2021-02-11"),
            Some(Utc.with_ymd_and_hms(2021, 2, 11, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_event_date("2021-02"), None);
    }

    #[test]
    fn page_envelope_decodes_unknown_fields_into_extra() {
        let body = r#"{
            "offset": 0,
            "limit": 300,
            "endOfRecords": true,
            "count": 1,
            "results": [{
                "key": 42,
                "species": "Panthera tigris",
                "decimalLatitude": 23.8,
                "decimalLongitude": 81.0,
                "eventDate": "2021-02-11T06:30:00",
                "basisOfRecord": "HUMAN_OBSERVATION",
                "country": "India"
            }]
        }"#;
        let page: SearchPage = serde_json::from_str(body).unwrap();
        assert!(page.end_of_records);
        assert_eq!(page.results.len(), 1);
        let record = &page.results[0];
        assert_eq!(record.species.as_deref(), Some(TAXON));
        assert_eq!(record.extra.get("country").unwrap(), "India");
    }
}
