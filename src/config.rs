//! Feed configuration.
//!
//! The original deployment baked the API key and feed URLs into the source
//! as process-wide globals. Here everything the reconciler needs is an
//! explicit [`FeedConfig`] passed in at construction: compiled-in defaults,
//! optionally overlaid from a `flymon.toml` file, with the API key usually
//! supplied via the `CWA_API_KEY` environment variable at startup.

use serde::Deserialize;
use std::path::Path;

use crate::stations;

/// Where to go when no forecast area matches the configured substring.
///
/// The feed's area list is township-granularity and occasionally renames
/// entries, so "no match" is a real operating condition, not a bug path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaFallbackPolicy {
    /// Report nothing for the forecast-derived fields.
    FailClosed,
    /// Retry with the configured neighboring district, then fail closed.
    NamedNeighbor,
    /// Degrade to the first area in the feed's list. Opt-in only: the
    /// substitute can be an unrelated township at the other end of the
    /// city, and the snapshot's source label is the sole hint.
    FirstListed,
}

/// Everything the reconciler needs to reach and interpret the feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// CWA open-data API key, sent as the `Authorization` query parameter.
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout. The only latency bound in the system.
    pub timeout_secs: u64,
    /// Station name substrings in fallback order.
    pub station_preference: Vec<String>,
    /// Substring matched against forecast area names.
    pub forecast_area: String,
    /// Neighboring district used by `AreaFallbackPolicy::NamedNeighbor`.
    pub neighbor_area: String,
    /// County/city name the almanac feed is addressed by.
    pub almanac_location: String,
    pub area_fallback: AreaFallbackPolicy,
    /// Ground the flight on any measured nonzero one-hour precipitation,
    /// regardless of the probability and wind thresholds.
    pub ground_on_measured_rain: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            api_key: String::new(),
            base_url: "https://opendata.cwa.gov.tw/api/v1/rest/datastore".to_string(),
            timeout_secs: 10,
            station_preference: stations::preference_order()
                .into_iter()
                .map(String::from)
                .collect(),
            forecast_area: "左營".to_string(),
            neighbor_area: "楠梓".to_string(),
            almanac_location: "高雄市".to_string(),
            area_fallback: AreaFallbackPolicy::NamedNeighbor,
            ground_on_measured_rain: true,
        }
    }
}

impl FeedConfig {
    /// Load configuration from a TOML file. A missing file is not an
    /// error — the compiled-in defaults apply; a file that exists but
    /// does not parse is.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FeedConfig, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(FeedConfig::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<FeedConfig, toml::de::Error> {
        toml::from_str(text)
    }

    /// URL for one datastore endpoint, with the API key attached.
    pub fn datastore_url(&self, dataset_id: &str) -> String {
        format!("{}/{}?Authorization={}", self.base_url, dataset_id, self.api_key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
