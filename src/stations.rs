/// Station registry for the Zuoying flight advisory service.
///
/// Defines the CWA surface stations consulted for real-time observations,
/// in fallback-preference order. This is the single source of truth for
/// the preference chain — the reconciler and the default configuration
/// both derive it from here rather than hardcoding names.
///
/// Matching is by name substring against the full downloaded station list,
/// not by station id: ids rotate when hardware is replaced, district names
/// do not.

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single CWA automatic weather station.
pub struct Station {
    /// CWA station id (C-prefixed for automatic stations, numeric for
    /// synoptic ones). Informational: selection goes by name.
    pub station_id: &'static str,
    /// Station name as it appears in the observation feed.
    pub name: &'static str,
    /// Role of the station in the fallback chain.
    pub description: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// Stations consulted for the flight site, ordered by preference. The
/// first entry whose temperature reading validates wins.
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        station_id: "C0V680",
        name: "左營",
        description: "Automatic station in the flight district itself. \
                      Preferred source whenever it is reporting.",
        latitude: 22.6897,
        longitude: 120.2939,
    },
    Station {
        station_id: "467440",
        name: "高雄",
        description: "Kaohsiung synoptic station, ~8 km south. Continuously \
                      staffed, so it keeps reporting when the district \
                      automatic station drops out.",
        latitude: 22.5660,
        longitude: 120.3157,
    },
    Station {
        station_id: "C0V460",
        name: "楠梓",
        description: "Neighboring district to the north. Last resort; \
                      microclimate differs slightly near the coast.",
        latitude: 22.7280,
        longitude: 120.3264,
    },
];

/// Station name substrings in fallback order, suitable for
/// `FeedConfig.station_preference`.
pub fn preference_order() -> Vec<&'static str> {
    STATION_REGISTRY.iter().map(|s| s.name).collect()
}

/// Looks up a registry entry whose name contains `name_substring`.
pub fn find_station(name_substring: &str) -> Option<&'static Station> {
    STATION_REGISTRY
        .iter()
        .find(|s| s.name.contains(name_substring))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
