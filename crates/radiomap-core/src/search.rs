//! Free-text station filtering.
//!
//! No index, no ranking — a full scan per call is fine at directory-fetch
//! sizes. A station matches when every whitespace-separated term of the
//! query is a case-insensitive substring of at least one searchable field
//! (name, country, city, language, or any tag).

use crate::station::Station;

/// Per-station match predicate. An empty or whitespace-only query matches
/// everything.
pub fn station_matches(station: &Station, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    query.split_whitespace().all(|term| {
        station.name.to_lowercase().contains(term)
            || station.country.to_lowercase().contains(term)
            || station.city.to_lowercase().contains(term)
            || station.language.to_lowercase().contains(term)
            || station.tags.iter().any(|tag| tag.to_lowercase().contains(term))
    })
}

/// Filter the collection, preserving input order.
pub fn filter_stations<'a>(stations: &'a [Station], query: &str) -> Vec<&'a Station> {
    stations
        .iter()
        .filter(|station| station_matches(station, query))
        .collect()
}

/// First station whose city or country contains the whole query — drives
/// the search-as-you-type map recenter. Note this is deliberately narrower
/// than [`station_matches`]: recentering on a name or tag hit would jump
/// the map around while typing.
pub fn first_match<'a>(stations: &'a [Station], query: &str) -> Option<&'a Station> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    stations.iter().find(|station| {
        station.city.to_lowercase().contains(&needle)
            || station.country.to_lowercase().contains(&needle)
    })
}
