//! Sunrise/sunset almanac feed client.
//!
//! The almanac is addressed by county/city name and returns one entry per
//! calendar day. Day matching happens client-side and must tolerate the
//! feed's recorded year disagreeing with the system year (entries are
//! published in bulk and survive year boundaries), so an exact date match
//! falls back to month/day-only containment.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::FeedConfig;
use crate::model::{AstronomicalDay, DATASET_ALMANAC, FeedError};
use crate::shape::{pick, pick_array, pick_str};

/// Parameter-name keywords identifying the two events in the almanac's
/// per-day parameter list.
pub const SUNRISE_KEYWORD: &str = "日出";
pub const SUNSET_KEYWORD: &str = "日沒";

pub fn build_almanac_url(config: &FeedConfig) -> String {
    format!(
        "{}&LocationName={}",
        config.datastore_url(DATASET_ALMANAC),
        config.almanac_location
    )
}

/// The per-day entry list for the configured location.
fn day_list<'a>(doc: &'a Value, config: &FeedConfig) -> Result<&'a Vec<Value>, FeedError> {
    let records = pick(doc, &["records", "Records"]).ok_or_else(|| {
        FeedError::MalformedShape("no records wrapper in almanac response".to_string())
    })?;
    let locations_node = pick(records, &["locations", "Locations"]).unwrap_or(records);

    // The locations node is an object in some versions and a one-element
    // array in others.
    let location_list = pick_array(locations_node, &["location", "Location"])
        .or_else(|| {
            locations_node
                .as_array()
                .and_then(|arr| arr.first())
                .and_then(|first| pick_array(first, &["location", "Location"]))
        })
        .ok_or_else(|| {
            FeedError::MalformedShape("no location list in almanac response".to_string())
        })?;

    // The server already filtered by LocationName; match defensively and
    // fall back to the first entry.
    let location = location_list
        .iter()
        .find(|l| {
            pick_str(l, &["LocationName", "locationName"])
                .is_some_and(|name| name.contains(&config.almanac_location))
        })
        .or_else(|| location_list.first())
        .ok_or_else(|| {
            FeedError::MalformedShape("empty location list in almanac response".to_string())
        })?;

    pick_array(location, &["time", "Time"]).ok_or_else(|| {
        FeedError::MalformedShape("no per-day list under almanac location".to_string())
    })
}

fn day_date(day: &Value) -> Option<&str> {
    pick_str(day, &["Date", "date", "dataTime", "DataTime"])
}

/// Find today's entry: exact date-string containment first, then relaxed
/// month/day-only containment for year mismatches.
pub fn match_day<'a>(days: &'a [Value], today: NaiveDate) -> Option<&'a Value> {
    let exact = today.format("%Y-%m-%d").to_string();
    if let Some(day) = days
        .iter()
        .find(|d| day_date(d).is_some_and(|s| s.contains(&exact)))
    {
        return Some(day);
    }

    let month_day = today.format("%m-%d").to_string();
    days.iter()
        .find(|d| day_date(d).is_some_and(|s| s.contains(&month_day)))
}

/// Extract the sunrise/sunset pair from one day entry. Probes the direct
/// fields of the newer shape before scanning the older parameter list for
/// the 日出/日沒 keywords.
fn extract_times(day: &Value) -> (Option<String>, Option<String>) {
    let mut sunrise = pick_str(day, &["SunRiseTime", "sunRiseTime", "sunrise"]).map(str::to_string);
    let mut sunset = pick_str(day, &["SunSetTime", "sunSetTime", "sunset"]).map(str::to_string);

    if sunrise.is_none() || sunset.is_none() {
        if let Some(parameters) = pick_array(day, &["parameter", "Parameter"]) {
            for parameter in parameters {
                let Some(name) = pick_str(parameter, &["parameterName", "ParameterName"]) else {
                    continue;
                };
                let value = pick_str(parameter, &["parameterValue", "ParameterValue", "Value"])
                    .map(str::to_string);
                if name.contains(SUNRISE_KEYWORD) && sunrise.is_none() {
                    sunrise = value;
                } else if name.contains(SUNSET_KEYWORD) && sunset.is_none() {
                    sunset = value;
                }
            }
        }
    }

    (sunrise, sunset)
}

/// Resolve today's sunrise/sunset for the configured location.
pub fn resolve_astronomy(
    doc: &Value,
    config: &FeedConfig,
    today: NaiveDate,
) -> Result<AstronomicalDay, FeedError> {
    let days = day_list(doc, config)?;
    let day = match_day(days, today).ok_or_else(|| {
        FeedError::MalformedShape(format!(
            "no almanac entry for {} ({} days listed)",
            today.format("%Y-%m-%d"),
            days.len()
        ))
    })?;

    let (sunrise, sunset) = extract_times(day);
    if sunrise.is_none() && sunset.is_none() {
        return Err(FeedError::MalformedShape(
            "matched almanac day has no sunrise/sunset parameters".to_string(),
        ));
    }

    Ok(AstronomicalDay {
        location_name: config.almanac_location.clone(),
        date: day_date(day).unwrap_or_default().to_string(),
        sunrise,
        sunset,
    })
}

/// `today` is injected by the caller so date matching stays deterministic
/// in tests.
pub fn fetch_astronomy(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
    today: NaiveDate,
) -> Result<AstronomicalDay, FeedError> {
    let doc = super::get_json(client, &build_almanac_url(config))?;
    resolve_astronomy(&doc, config, today)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter_shape_doc(date: &str) -> Value {
        serde_json::from_str(&format!(
            r#"{{
            "records": {{
                "locations": {{
                    "location": [{{
                        "locationName": "高雄市",
                        "time": [{{
                            "dataTime": "{}",
                            "parameter": [
                                {{"parameterName": "日出時刻", "parameterValue": "05:25"}},
                                {{"parameterName": "日沒時刻", "parameterValue": "18:40"}}
                            ]
                        }}]
                    }}]
                }}
            }}
        }}"#,
            date
        ))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    #[test]
    fn test_exact_date_match_with_parameter_list() {
        let doc = parameter_shape_doc("2026-08-06");
        let day = resolve_astronomy(&doc, &FeedConfig::default(), today()).unwrap();
        assert_eq!(day.sunrise.as_deref(), Some("05:25"));
        assert_eq!(day.sunset.as_deref(), Some("18:40"));
        assert_eq!(day.location_name, "高雄市");
    }

    #[test]
    fn test_relaxed_month_day_match_across_year_boundary() {
        // Almanac still carries last year's date; month/day containment
        // must rescue the match.
        let doc = parameter_shape_doc("2025-08-06");
        let day = resolve_astronomy(&doc, &FeedConfig::default(), today()).unwrap();
        assert_eq!(day.sunrise.as_deref(), Some("05:25"));
        assert_eq!(day.date, "2025-08-06");
    }

    #[test]
    fn test_wrong_day_is_not_matched() {
        let doc = parameter_shape_doc("2026-08-07");
        assert!(matches!(
            resolve_astronomy(&doc, &FeedConfig::default(), today()),
            Err(FeedError::MalformedShape(_))
        ));
    }

    #[test]
    fn test_direct_field_shape() {
        let doc: Value = serde_json::from_str(
            r#"{
            "records": {
                "Locations": [{
                    "Location": [{
                        "LocationName": "高雄市",
                        "Time": [
                            {"Date": "2026-08-06",
                             "SunRiseTime": "05:25", "SunSetTime": "18:40"}
                        ]
                    }]
                }]
            }
        }"#,
        )
        .unwrap();
        let day = resolve_astronomy(&doc, &FeedConfig::default(), today()).unwrap();
        assert_eq!(day.sunrise.as_deref(), Some("05:25"));
        assert_eq!(day.sunset.as_deref(), Some("18:40"));
    }

    #[test]
    fn test_day_without_any_times_is_malformed() {
        let doc: Value = serde_json::from_str(
            r#"{
            "records": {
                "locations": {
                    "location": [{
                        "locationName": "高雄市",
                        "time": [{"dataTime": "2026-08-06", "parameter": []}]
                    }]
                }
            }
        }"#,
        )
        .unwrap();
        assert!(resolve_astronomy(&doc, &FeedConfig::default(), today()).is_err());
    }

    #[test]
    fn test_empty_document_is_malformed_not_a_panic() {
        let doc: Value = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            resolve_astronomy(&doc, &FeedConfig::default(), today()),
            Err(FeedError::MalformedShape(_))
        ));
    }

    #[test]
    fn test_almanac_url_is_location_addressed() {
        let config = FeedConfig {
            api_key: "CWA-XYZ".to_string(),
            ..FeedConfig::default()
        };
        let url = build_almanac_url(&config);
        assert!(url.contains("A-B0062-001"));
        assert!(url.contains("LocationName=高雄市"));
    }
}
