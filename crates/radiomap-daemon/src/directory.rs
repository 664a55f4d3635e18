//! radio-browser directory client.
//!
//! The directory is a pool of equivalent mirrors; one is picked at random
//! per fetch to spread load. A failed fetch is NOT retried against another
//! mirror — recovery is the user's explicit Refresh.

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use radiomap_core::config::DirectoryConfig;
use radiomap_core::normalize::normalize_stations;
use radiomap_core::station::{RawStation, Station};

/// How many shortcut countries the UI gets.
const POPULAR_COUNTRY_COUNT: usize = 10;
/// Countries with this many stations or fewer never make the shortcut row.
const POPULAR_COUNTRY_FLOOR: u64 = 10;

/// Row of the `/countries` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stationcount: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    mirrors: Vec<String>,
    fetch_limit: u32,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            mirrors: config.mirrors.clone(),
            fetch_limit: config.fetch_limit,
        }
    }

    /// One mirror, chosen at random per call.
    fn base(&self) -> &str {
        self.mirrors
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("https://de1.api.radio-browser.info/json")
    }

    /// Fetch and normalize the station catalog. Records that fail to decode
    /// individually are dropped, never the batch; only the HTTP exchange
    /// itself can fail.
    pub async fn fetch_stations(&self) -> Result<Vec<Station>, DirectoryError> {
        let url = format!(
            "{}/stations/search?limit={}&hidebroken=true&has_geo_info=true",
            self.base(),
            self.fetch_limit
        );
        debug!("fetching stations: {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status()));
        }

        let records: Vec<serde_json::Value> = response.json().await?;
        let total = records.len();
        let raw: Vec<RawStation> = records
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if raw.len() < total {
            debug!("dropped {} undecodable directory records", total - raw.len());
        }

        let stations = normalize_stations(raw);
        debug!("normalized {} of {} directory records", stations.len(), total);
        Ok(stations)
    }

    /// Fetch the popular-country shortcut list. Failures here are the
    /// caller's to absorb — they never gate the catalog.
    pub async fn fetch_popular_countries(&self) -> Result<Vec<String>, DirectoryError> {
        let url = format!("{}/countries", self.base());
        debug!("fetching countries: {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status()));
        }

        let rows: Vec<RawCountry> = response.json().await?;
        Ok(popular_countries(rows))
    }

    /// Report a station click so the directory can improve its rankings.
    /// Fire-and-forget: the response is ignored and failures only logged.
    pub fn report_click(&self, station_id: &str) {
        let url = format!("{}/url/{}", self.base(), station_id);
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).send().await {
                debug!("click report failed (ignored): {e}");
            }
        });
    }
}

/// Reduce the countries listing to the shortcut row: drop unnamed and tiny
/// entries, sort by station count descending, keep the top names.
pub fn popular_countries(mut rows: Vec<RawCountry>) -> Vec<String> {
    rows.retain(|row| !row.name.is_empty() && row.stationcount > POPULAR_COUNTRY_FLOOR);
    rows.sort_by(|a, b| b.stationcount.cmp(&a.stationcount));
    rows.into_iter()
        .take(POPULAR_COUNTRY_COUNT)
        .map(|row| row.name)
        .collect()
}
