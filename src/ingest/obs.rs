//! Real-time observation feed client (CWA automatic weather stations).
//!
//! Downloads the full station list and filters locally rather than
//! addressing a single station id: ids rotate when hardware is replaced,
//! while district names stay put, and the full list is what makes the
//! fallback chain possible at all.

use serde_json::Value;

use crate::config::FeedConfig;
use crate::model::{DATASET_OBSERVATION, FeedError, StationRecord};
use crate::shape::{pick, pick_array, pick_f64, pick_str};

pub fn build_obs_url(config: &FeedConfig) -> String {
    config.datastore_url(DATASET_OBSERVATION)
}

/// Parse the observation feed body into station records.
///
/// Tolerates the `records`/`Records` wrapper casings and the
/// `Station`/`station` list casings. Individual stations with unusable
/// shapes are skipped, never fatal for the whole feed.
pub fn parse_obs_response(body: &str) -> Result<Vec<StationRecord>, FeedError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| FeedError::MalformedShape(format!("observation body is not JSON: {}", e)))?;
    parse_obs_document(&doc)
}

pub fn parse_obs_document(doc: &Value) -> Result<Vec<StationRecord>, FeedError> {
    let records = pick(doc, &["records", "Records"]).ok_or_else(|| {
        FeedError::MalformedShape("no records wrapper in observation response".to_string())
    })?;
    let stations = pick_array(records, &["Station", "station"]).ok_or_else(|| {
        FeedError::MalformedShape("no station list under records".to_string())
    })?;

    Ok(stations.iter().filter_map(parse_station).collect())
}

/// One station entry. Returns `None` only when the entry has no name at
/// all; missing readings become `None` fields on the record.
fn parse_station(station: &Value) -> Option<StationRecord> {
    let station_name = pick_str(station, &["StationName", "stationName", "locationName"])?.to_string();
    let station_id =
        pick_str(station, &["StationId", "stationId", "stationID"]).map(str::to_string);

    // Newer shape nests the timestamp as ObsTime.DateTime; older mirrors
    // carry a bare string.
    let obs_time = pick(station, &["ObsTime", "obsTime", "time"]).and_then(|t| {
        t.as_str()
            .map(str::to_string)
            .or_else(|| pick_str(t, &["DateTime", "dateTime", "obsTime"]).map(str::to_string))
    });

    // Readings live under a WeatherElement wrapper in the current feed;
    // probe the station object itself as a last resort.
    let element = pick(station, &["WeatherElement", "weatherElement"]).unwrap_or(station);

    let air_temperature_c = pick_f64(element, &["AirTemperature", "airTemperature", "TEMP"]);

    let raw_precip = pick(element, &["Now", "now"])
        .and_then(|now| pick_f64(now, &["Precipitation", "precipitation"]))
        .or_else(|| pick_f64(element, &["Precipitation", "precipitation", "HOUR_1"]));
    // A negative precipitation reading is the offline sentinel: clamp to
    // zero and flag, never report it as rainfall.
    let (precip_1hr_mm, precip_clamped) = match raw_precip {
        Some(p) if p < 0.0 => (Some(0.0), true),
        other => (other, false),
    };

    // Negative wind is the same sentinel family; drop it entirely.
    let wind_speed_ms =
        pick_f64(element, &["WindSpeed", "windSpeed", "WDSD"]).filter(|w| *w >= 0.0);

    Some(StationRecord {
        station_name,
        station_id,
        obs_time,
        air_temperature_c,
        precip_1hr_mm,
        precip_clamped,
        wind_speed_ms,
    })
}

/// Walk the preference order and return the first station whose name
/// contains the candidate substring and whose temperature reading is live.
pub fn select_station<'a>(
    stations: &'a [StationRecord],
    preference: &[String],
) -> Option<&'a StationRecord> {
    preference.iter().find_map(|candidate| {
        stations
            .iter()
            .find(|s| s.station_name.contains(candidate.as_str()) && s.has_valid_temperature())
    })
}

/// Fetch the station list and resolve it through the fallback chain.
pub fn fetch_observation(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
) -> Result<StationRecord, FeedError> {
    let doc = super::get_json(client, &build_obs_url(config))?;
    let stations = parse_obs_document(&doc)?;
    select_station(&stations, &config.station_preference)
        .cloned()
        .ok_or_else(|| FeedError::NoMatchingStation(config.station_preference.join(" → ")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
