//! Canonical station model and the raw directory record it is built from.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::geo::GeoPoint;

/// A normalized, displayable radio stream. Immutable once built; the whole
/// collection is replaced on refetch. `position` is always populated —
/// records that cannot be displayed or played never become a `Station`, and
/// geo resolution is total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// Playable stream address.
    pub url: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub language: String,
    /// Station icon URL; a generated placeholder when the source has none.
    #[serde(default)]
    pub favicon: String,
    /// Trimmed, non-empty tag strings. Order carries no meaning.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub click_count: u64,
    /// Coordinates exactly as the source supplied them, when it did.
    pub raw_latitude: Option<f64>,
    pub raw_longitude: Option<f64>,
    /// Resolved map position. Always present.
    pub position: GeoPoint,
}

/// Raw record as returned by the directory's `/stations/search` endpoint.
///
/// Kept separate from `Station` so the wire schema can drift without
/// touching the canonical struct. Every field defaults — a record is only
/// rejected during normalization, never during decoding of its fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStation {
    #[serde(default)]
    pub stationuuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Directly playable address after the directory followed redirects.
    /// Preferred over `url` when present.
    #[serde(default)]
    pub url_resolved: String,
    #[serde(default)]
    pub country: String,
    /// The directory calls the region field `state`; shown as the city.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub tags: RawTags,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub clickcount: u64,
    #[serde(default)]
    pub geo_lat: RawCoord,
    #[serde(default)]
    pub geo_long: RawCoord,
}

/// Tags arrive either as one comma-joined string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    Joined(String),
    List(Vec<String>),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::Joined(String::new())
    }
}

impl RawTags {
    /// Canonical tag set: split on commas, trim, drop empties.
    pub fn into_vec(self) -> Vec<String> {
        let parts: Vec<String> = match self {
            RawTags::Joined(joined) => joined.split(',').map(str::to_string).collect(),
            RawTags::List(list) => list,
        };
        parts
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Coordinates arrive as a number, a numeric string, null, or not at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum RawCoord {
    #[default]
    Absent,
    Num(f64),
    Text(String),
}

impl RawCoord {
    /// The coordinate as a finite f64, or `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawCoord::Absent => None,
            RawCoord::Num(value) => Some(*value).filter(|v| v.is_finite()),
            RawCoord::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

/// Stable fallback id for records the directory did not give a UUID.
pub fn synthesize_id(name: &str, url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    url.hash(&mut hasher);
    format!("local-{:016x}", hasher.finish())
}

/// Generated avatar URL for stations that supply no favicon, parameterized
/// by the display name so every station gets a distinct image.
pub fn placeholder_favicon(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff&size=50",
        percent_encode(name)
    )
}

/// Percent-encode a query-string value (RFC 3986 unreserved set kept).
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_station_decodes_with_everything_missing() {
        let raw: RawStation = serde_json::from_str("{}").unwrap();
        assert!(raw.stationuuid.is_empty());
        assert!(raw.geo_lat.as_f64().is_none());
        assert!(raw.tags.into_vec().is_empty());
    }

    #[test]
    fn tags_coerce_from_joined_string() {
        let tags = RawTags::Joined("pop, rock , ,jazz".to_string());
        assert_eq!(tags.into_vec(), vec!["pop", "rock", "jazz"]);
    }

    #[test]
    fn tags_coerce_from_list() {
        let tags = RawTags::List(vec![" news ".to_string(), String::new()]);
        assert_eq!(tags.into_vec(), vec!["news"]);
    }

    #[test]
    fn coordinates_parse_from_number_and_string() {
        let raw: RawStation =
            serde_json::from_str(r#"{"geo_lat": 41.0, "geo_long": "28.95"}"#).unwrap();
        assert_eq!(raw.geo_lat.as_f64(), Some(41.0));
        assert_eq!(raw.geo_long.as_f64(), Some(28.95));
    }

    #[test]
    fn null_and_garbage_coordinates_are_absent() {
        let raw: RawStation =
            serde_json::from_str(r#"{"geo_lat": null, "geo_long": "north"}"#).unwrap();
        assert_eq!(raw.geo_lat.as_f64(), None);
        assert_eq!(raw.geo_long.as_f64(), None);
    }

    #[test]
    fn synthesized_ids_are_stable() {
        let a = synthesize_id("Radio One", "http://one.example/stream");
        let b = synthesize_id("Radio One", "http://one.example/stream");
        assert_eq!(a, b);
        assert_ne!(a, synthesize_id("Radio Two", "http://two.example/stream"));
    }

    #[test]
    fn placeholder_favicon_encodes_the_name() {
        let url = placeholder_favicon("Cool FM 101");
        assert!(url.contains("name=Cool%20FM%20101"));
        assert!(url.starts_with("https://ui-avatars.com/api/"));
    }
}
