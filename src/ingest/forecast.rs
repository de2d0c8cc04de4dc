//! Short-term forecast feed client (CWA township forecasts).
//!
//! The deepest and least stable of the three feeds:
//! `records → Locations[0] → Location[] → WeatherElement[] → Time[] →
//! ElementValue[0]`, with casing variants at every level, a flatter
//! city-granularity variant that drops the `Locations` wrapper, and
//! element/value names that differ between the two granularities (wind
//! speed is `風速`/`WindSpeed` in one and `WS`/`value` in the other).

use std::collections::HashMap;

use serde_json::Value;

use crate::config::{AreaFallbackPolicy, FeedConfig};
use crate::model::{DATASET_FORECAST, FeedError, ForecastValue};
use crate::shape::{is_placeholder, parse_reading, pick, pick_array, pick_str};

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// The forecast variables the advisory consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastElement {
    Temperature,
    ApparentTemperature,
    PrecipProbability,
    WindSpeed,
    Description,
}

impl ForecastElement {
    pub const ALL: [ForecastElement; 5] = [
        ForecastElement::Temperature,
        ForecastElement::ApparentTemperature,
        ForecastElement::PrecipProbability,
        ForecastElement::WindSpeed,
        ForecastElement::Description,
    ];

    /// Keys the value may hide under inside one `ElementValue` entry,
    /// across both feed granularities. The bare `value`/`Value` of the
    /// older shape comes last.
    fn value_aliases(self) -> &'static [&'static str] {
        match self {
            ForecastElement::Temperature => &["Temperature", "T", "value", "Value"],
            ForecastElement::ApparentTemperature => &[
                "MaxApparentTemperature",
                "ApparentTemperature",
                "AT",
                "value",
                "Value",
            ],
            ForecastElement::PrecipProbability => {
                &["ProbabilityOfPrecipitation", "PoP", "value", "Value"]
            }
            ForecastElement::WindSpeed => &["WindSpeed", "WS", "value", "Value"],
            ForecastElement::Description => {
                &["WeatherDescription", "Weather", "value", "Value"]
            }
        }
    }

    /// Numeric elements reject values that do not parse as a non-negative
    /// number; the textual summary only rejects placeholders.
    fn is_numeric(self) -> bool {
        !matches!(self, ForecastElement::Description)
    }
}

/// Map a wire element name onto the element it describes.
///
/// Checked most-specific first: `平均溫度` and `最高體感溫度` both contain
/// `溫度`, so apparent temperature must win before the plain-temperature
/// containment check runs.
pub fn classify_element_name(name: &str) -> Option<ForecastElement> {
    if name.contains("體感") || name == "AT" {
        Some(ForecastElement::ApparentTemperature)
    } else if name.contains("降雨機率") || name.starts_with("PoP") {
        Some(ForecastElement::PrecipProbability)
    } else if name.contains("風速") || name == "WS" {
        Some(ForecastElement::WindSpeed)
    } else if name.contains("溫度") || name == "T" {
        Some(ForecastElement::Temperature)
    } else if name.contains("描述") || name.contains("天氣現象") || name == "Wx"
        || name == "WeatherDescription"
    {
        Some(ForecastElement::Description)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Area location
// ---------------------------------------------------------------------------

pub fn build_forecast_url(config: &FeedConfig) -> String {
    config.datastore_url(DATASET_FORECAST)
}

/// The feed's flat list of areas, whichever granularity and casing the
/// response uses.
fn area_list(doc: &Value) -> Result<&Vec<Value>, FeedError> {
    let records = pick(doc, &["records", "Records"]).ok_or_else(|| {
        FeedError::MalformedShape("no records wrapper in forecast response".to_string())
    })?;

    // Township granularity wraps the areas one level deeper.
    if let Some(wrapper) = pick_array(records, &["Locations", "locations"]) {
        let first = wrapper.first().ok_or_else(|| {
            FeedError::MalformedShape("empty Locations wrapper in forecast response".to_string())
        })?;
        return pick_array(first, &["Location", "location"]).ok_or_else(|| {
            FeedError::MalformedShape("no Location list under Locations".to_string())
        });
    }

    // City granularity: areas sit directly under records.
    pick_array(records, &["Location", "location"]).ok_or_else(|| {
        FeedError::MalformedShape("no location list in forecast response".to_string())
    })
}

fn area_name(area: &Value) -> Option<&str> {
    pick_str(area, &["LocationName", "locationName"])
}

fn find_area<'a>(areas: &'a [Value], substring: &str) -> Option<(String, &'a Value)> {
    areas.iter().find_map(|area| {
        let name = area_name(area)?;
        name.contains(substring).then(|| (name.to_string(), area))
    })
}

/// Locate the forecast area for the configured district, applying the
/// configured fallback policy when the exact substring finds nothing.
pub fn locate_area<'a>(
    doc: &'a Value,
    config: &FeedConfig,
) -> Result<(String, &'a Value), FeedError> {
    let areas = area_list(doc)?;

    if let Some(found) = find_area(areas, &config.forecast_area) {
        return Ok(found);
    }

    match config.area_fallback {
        AreaFallbackPolicy::FailClosed => {
            Err(FeedError::NoMatchingArea(config.forecast_area.clone()))
        }
        AreaFallbackPolicy::NamedNeighbor => {
            find_area(areas, &config.neighbor_area).ok_or_else(|| {
                FeedError::NoMatchingArea(format!(
                    "{} (neighbor {} also missing)",
                    config.forecast_area, config.neighbor_area
                ))
            })
        }
        AreaFallbackPolicy::FirstListed => areas
            .first()
            .and_then(|area| Some((area_name(area)?.to_string(), area)))
            .ok_or_else(|| {
                FeedError::NoMatchingArea(format!("{} (area list empty)", config.forecast_area))
            }),
    }
}

// ---------------------------------------------------------------------------
// Element extraction
// ---------------------------------------------------------------------------

/// For each wanted element, scan its time-ordered sequence and keep the
/// first value that is usable. Elements with no usable value are simply
/// absent from the map — never an error for the whole feed.
pub fn extract_elements(
    area: &Value,
    area_name: &str,
    wanted: &[ForecastElement],
) -> HashMap<ForecastElement, ForecastValue> {
    let mut out = HashMap::new();
    let Some(elements) = pick_array(area, &["WeatherElement", "weatherElement"]) else {
        return out;
    };

    for element in elements {
        let Some(name) = pick_str(element, &["ElementName", "elementName"]) else {
            continue;
        };
        let Some(kind) = classify_element_name(name) else {
            continue;
        };
        if !wanted.contains(&kind) || out.contains_key(&kind) {
            continue;
        }

        let Some(times) = pick_array(element, &["Time", "time"]) else {
            continue;
        };
        for entry in times {
            if let Some(value) = usable_value(entry, kind) {
                let start_time = pick_str(entry, &["StartTime", "startTime", "DataTime", "dataTime"])
                    .unwrap_or_default()
                    .to_string();
                out.insert(
                    kind,
                    ForecastValue {
                        value,
                        area_name: area_name.to_string(),
                        start_time,
                    },
                );
                break;
            }
        }
    }

    out
}

/// Pull a usable value out of one time entry, or `None` to advance to the
/// next time-stamped entry.
fn usable_value(entry: &Value, kind: ForecastElement) -> Option<String> {
    // Current shapes carry an ElementValue array; the oldest city-level
    // shape used a single `parameter` object with `parameterName`.
    let holder = pick_array(entry, &["ElementValue", "elementValue"])
        .and_then(|values| values.first())
        .or_else(|| pick(entry, &["parameter", "Parameter"]))?;

    let mut aliases: Vec<&str> = kind.value_aliases().to_vec();
    aliases.push("parameterName");
    let raw = pick_str(holder, &aliases)?;

    if is_placeholder(raw) {
        return None;
    }
    if kind.is_numeric() && !parse_reading(raw).is_some_and(|v| v >= 0.0) {
        return None;
    }
    Some(raw.trim().to_string())
}

/// Locate the area and resolve every wanted element in one pass.
pub fn resolve_forecast(
    doc: &Value,
    config: &FeedConfig,
    wanted: &[ForecastElement],
) -> Result<HashMap<ForecastElement, ForecastValue>, FeedError> {
    let (name, area) = locate_area(doc, config)?;
    Ok(extract_elements(area, &name, wanted))
}

pub fn fetch_forecast(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
    wanted: &[ForecastElement],
) -> Result<HashMap<ForecastElement, ForecastValue>, FeedError> {
    let doc = super::get_json(client, &build_forecast_url(config))?;
    resolve_forecast(&doc, config, wanted)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn township_doc() -> Value {
        serde_json::from_str(
            r#"{
            "records": {
                "Locations": [{
                    "Location": [{
                        "LocationName": "左營區",
                        "WeatherElement": [
                            {
                                "ElementName": "平均溫度",
                                "Time": [
                                    {"StartTime": "2026-08-06T12:00:00+08:00",
                                     "ElementValue": [{"Temperature": "31"}]}
                                ]
                            },
                            {
                                "ElementName": "最高體感溫度",
                                "Time": [
                                    {"StartTime": "2026-08-06T12:00:00+08:00",
                                     "ElementValue": [{"MaxApparentTemperature": "36"}]}
                                ]
                            },
                            {
                                "ElementName": "12小時降雨機率",
                                "Time": [
                                    {"StartTime": "2026-08-06T12:00:00+08:00",
                                     "ElementValue": [{"ProbabilityOfPrecipitation": "-"}]},
                                    {"StartTime": "2026-08-06T18:00:00+08:00",
                                     "ElementValue": [{"ProbabilityOfPrecipitation": "20"}]}
                                ]
                            },
                            {
                                "ElementName": "風速",
                                "Time": [
                                    {"StartTime": "2026-08-06T12:00:00+08:00",
                                     "ElementValue": [{"WindSpeed": "4"}]}
                                ]
                            },
                            {
                                "ElementName": "天氣預報綜合描述",
                                "Time": [
                                    {"StartTime": "2026-08-06T12:00:00+08:00",
                                     "ElementValue": [{"WeatherDescription": "晴時多雲。"}]}
                                ]
                            }
                        ]
                    }]
                }]
            }
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolves_all_elements_from_township_shape() {
        let config = FeedConfig::default();
        let resolved = resolve_forecast(&township_doc(), &config, &ForecastElement::ALL)
            .expect("area should match");
        assert_eq!(resolved[&ForecastElement::Temperature].value, "31");
        assert_eq!(resolved[&ForecastElement::ApparentTemperature].value, "36");
        assert_eq!(resolved[&ForecastElement::WindSpeed].value, "4");
        assert_eq!(resolved[&ForecastElement::Description].value, "晴時多雲。");
        assert_eq!(resolved[&ForecastElement::Temperature].area_name, "左營區");
    }

    #[test]
    fn test_placeholder_skips_to_next_time_entry() {
        // First PoP window is "-": the 18:00 window's 20 must win.
        let config = FeedConfig::default();
        let resolved =
            resolve_forecast(&township_doc(), &config, &ForecastElement::ALL).unwrap();
        let pop = &resolved[&ForecastElement::PrecipProbability];
        assert_eq!(pop.value, "20");
        assert!(pop.start_time.contains("18:00"));
    }

    #[test]
    fn test_city_level_shape_with_ws_element() {
        // City granularity: no Locations wrapper, code-style element names,
        // bare `value` keys, lowercase casings.
        let doc: Value = serde_json::from_str(
            r#"{
            "records": {
                "location": [{
                    "locationName": "高雄市",
                    "weatherElement": [
                        {"elementName": "WS",
                         "time": [{"startTime": "2026-08-06T12:00:00+08:00",
                                   "elementValue": [{"value": "5.1"}]}]},
                        {"elementName": "PoP12h",
                         "time": [{"startTime": "2026-08-06T12:00:00+08:00",
                                   "elementValue": [{"value": "10"}]}]},
                        {"elementName": "Wx",
                         "time": [{"startTime": "2026-08-06T12:00:00+08:00",
                                   "parameter": {"parameterName": "多雲"}}]}
                    ]
                }]
            }
        }"#,
        )
        .unwrap();
        let config = FeedConfig {
            forecast_area: "高雄".to_string(),
            ..FeedConfig::default()
        };
        let resolved = resolve_forecast(&doc, &config, &ForecastElement::ALL).unwrap();
        assert_eq!(resolved[&ForecastElement::WindSpeed].value, "5.1");
        assert_eq!(resolved[&ForecastElement::PrecipProbability].value, "10");
        assert_eq!(resolved[&ForecastElement::Description].value, "多雲");
        assert!(!resolved.contains_key(&ForecastElement::Temperature));
    }

    #[test]
    fn test_negative_numeric_value_is_rejected() {
        let doc: Value = serde_json::from_str(
            r#"{
            "records": {
                "Locations": [{
                    "Location": [{
                        "LocationName": "左營區",
                        "WeatherElement": [
                            {"ElementName": "風速",
                             "Time": [
                                {"StartTime": "t1", "ElementValue": [{"WindSpeed": "-99"}]},
                                {"StartTime": "t2", "ElementValue": [{"WindSpeed": "3"}]}
                             ]}
                        ]
                    }]
                }]
            }
        }"#,
        )
        .unwrap();
        let resolved =
            resolve_forecast(&doc, &FeedConfig::default(), &ForecastElement::ALL).unwrap();
        assert_eq!(resolved[&ForecastElement::WindSpeed].value, "3");
    }

    fn neighbor_only_doc() -> Value {
        serde_json::from_str(
            r#"{
            "records": {
                "Locations": [{
                    "Location": [
                        {"LocationName": "鳳山區", "WeatherElement": []},
                        {"LocationName": "楠梓區", "WeatherElement": []}
                    ]
                }]
            }
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_area_fallback_named_neighbor() {
        let config = FeedConfig::default(); // NamedNeighbor, neighbor 楠梓
        let (name, _) = locate_area(&neighbor_only_doc(), &config).unwrap();
        assert_eq!(name, "楠梓區");
    }

    #[test]
    fn test_area_fallback_fail_closed() {
        let config = FeedConfig {
            area_fallback: AreaFallbackPolicy::FailClosed,
            ..FeedConfig::default()
        };
        assert!(matches!(
            locate_area(&neighbor_only_doc(), &config),
            Err(FeedError::NoMatchingArea(_))
        ));
    }

    #[test]
    fn test_area_fallback_first_listed() {
        let config = FeedConfig {
            area_fallback: AreaFallbackPolicy::FirstListed,
            neighbor_area: "旗津".to_string(), // neighbor also missing
            ..FeedConfig::default()
        };
        let (name, _) = locate_area(&neighbor_only_doc(), &config).unwrap();
        assert_eq!(name, "鳳山區");
    }

    #[test]
    fn test_neighbor_missing_fails_closed() {
        let config = FeedConfig {
            neighbor_area: "旗津".to_string(),
            ..FeedConfig::default()
        };
        let err = locate_area(&neighbor_only_doc(), &config).unwrap_err();
        assert!(matches!(err, FeedError::NoMatchingArea(_)));
        assert!(err.to_string().contains("旗津"));
    }

    #[test]
    fn test_empty_body_yields_malformed_shape() {
        let doc: Value = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            locate_area(&doc, &FeedConfig::default()),
            Err(FeedError::MalformedShape(_))
        ));
    }

    #[test]
    fn test_classify_element_name_specificity() {
        // 最高體感溫度 contains 溫度 but must classify as apparent.
        assert_eq!(
            classify_element_name("最高體感溫度"),
            Some(ForecastElement::ApparentTemperature)
        );
        assert_eq!(classify_element_name("平均溫度"), Some(ForecastElement::Temperature));
        assert_eq!(classify_element_name("PoP6h"), Some(ForecastElement::PrecipProbability));
        assert_eq!(classify_element_name("相對濕度"), None);
    }
}
