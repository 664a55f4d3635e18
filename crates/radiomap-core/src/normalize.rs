//! Directory record normalization.
//!
//! Raw records go in, canonical [`Station`]s come out. Records that can be
//! neither displayed nor played (no name, or no playable URL) are dropped;
//! everything else survives with defaults filled in and a guaranteed map
//! position. Output order is whatever the source sent — callers must not
//! rely on it.

use std::collections::HashSet;

use tracing::debug;

use crate::geo;
use crate::station::{placeholder_favicon, synthesize_id, RawStation, Station};

/// Build the canonical station collection from one directory fetch.
pub fn normalize_stations(raw: Vec<RawStation>) -> Vec<Station> {
    let total = raw.len();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut stations = Vec::with_capacity(raw.len());

    for record in raw {
        let url = if record.url_resolved.trim().is_empty() {
            record.url.trim().to_string()
        } else {
            record.url_resolved.trim().to_string()
        };
        if url.is_empty() || record.name.trim().is_empty() {
            continue;
        }

        let id = unique_id(&record.stationuuid, &record.name, &url, &mut seen_ids);

        let raw_latitude = record.geo_lat.as_f64();
        let raw_longitude = record.geo_long.as_f64();
        let position = geo::resolve_position(&id, &record.country, raw_latitude, raw_longitude);

        let favicon = if record.favicon.trim().is_empty() {
            placeholder_favicon(&record.name)
        } else {
            record.favicon
        };

        stations.push(Station {
            id,
            name: record.name,
            url,
            country: record.country,
            city: record.state,
            language: record.language,
            favicon,
            tags: record.tags.into_vec(),
            votes: record.votes,
            click_count: record.clickcount,
            raw_latitude,
            raw_longitude,
            position,
        });
    }

    if stations.len() < total {
        debug!("dropped {} unplayable records", total - stations.len());
    }
    stations
}

/// Source UUID when present, else a hash of name+url; ids must be unique
/// within one batch, so colliding duplicates get a numeric suffix.
fn unique_id(uuid: &str, name: &str, url: &str, seen: &mut HashSet<String>) -> String {
    let mut id = if uuid.trim().is_empty() {
        synthesize_id(name, url)
    } else {
        uuid.trim().to_string()
    };
    if !seen.insert(id.clone()) {
        let mut n = 1usize;
        loop {
            let candidate = format!("{}-{}", id, n);
            if seen.insert(candidate.clone()) {
                id = candidate;
                break;
            }
            n += 1;
        }
    }
    id
}
