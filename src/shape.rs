//! Tolerant JSON lookups for the CWA open-data feeds.
//!
//! Key casing and nesting are not stable across feed versions
//! (`records`/`Records`, `locationName`/`LocationName`, values as numbers
//! in one dataset and decimal strings in another). Every lookup in the
//! ingest layer goes through the alias helpers here so that schema
//! volatility stays at this boundary instead of leaking `.get(a)` /
//! `.get(b)` chains into the business logic.

use serde_json::Value;

/// Returns the value under the first alias present on `v`.
pub fn pick<'a>(v: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| v.get(key))
}

/// Like [`pick`], narrowed to an array.
pub fn pick_array<'a>(v: &'a Value, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    pick(v, aliases).and_then(Value::as_array)
}

/// Like [`pick`], narrowed to a string slice.
pub fn pick_str<'a>(v: &'a Value, aliases: &[&str]) -> Option<&'a str> {
    pick(v, aliases).and_then(Value::as_str)
}

/// Numeric field that may arrive as a JSON number or as a decimal string.
/// Placeholder strings are rejected, not parsed as zero.
pub fn pick_f64(v: &Value, aliases: &[&str]) -> Option<f64> {
    match pick(v, aliases)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_reading(s),
        _ => None,
    }
}

/// True for the strings the feeds use to mean "no value yet": a bare dash,
/// an empty or whitespace-only string, or a slash.
pub fn is_placeholder(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || trimmed == "-" || trimmed == "--" || trimmed == "/"
}

/// Parse a decimal wire string into a reading. Placeholders and
/// non-numeric strings are `None`; sign is NOT checked here — negative
/// sentinels are handled per-field by the callers.
pub fn parse_reading(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if is_placeholder(trimmed) {
        return None;
    }
    trimmed.parse().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_prefers_earlier_alias() {
        let v = json!({"records": 1, "Records": 2});
        assert_eq!(pick(&v, &["records", "Records"]), Some(&json!(1)));
    }

    #[test]
    fn test_pick_falls_through_to_later_alias() {
        let v = json!({"Records": {"Station": []}});
        assert!(pick(&v, &["records", "Records"]).is_some());
        assert!(pick(&v, &["records", "recs"]).is_none());
    }

    #[test]
    fn test_pick_array_rejects_non_array() {
        let v = json!({"Station": {"name": "x"}});
        assert!(pick_array(&v, &["Station", "station"]).is_none());
        let v = json!({"station": [1, 2]});
        assert_eq!(pick_array(&v, &["Station", "station"]).map(Vec::len), Some(2));
    }

    #[test]
    fn test_pick_f64_accepts_number_and_decimal_string() {
        let v = json!({"WindSpeed": 3.2});
        assert_eq!(pick_f64(&v, &["WindSpeed"]), Some(3.2));
        let v = json!({"WindSpeed": "3.2"});
        assert_eq!(pick_f64(&v, &["WindSpeed"]), Some(3.2));
    }

    #[test]
    fn test_pick_f64_rejects_placeholder_string() {
        let v = json!({"WindSpeed": "-"});
        assert_eq!(pick_f64(&v, &["WindSpeed"]), None);
        let v = json!({"WindSpeed": " "});
        assert_eq!(pick_f64(&v, &["WindSpeed"]), None);
    }

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder("-"));
        assert!(is_placeholder(""));
        assert!(is_placeholder("  "));
        assert!(is_placeholder("--"));
        assert!(is_placeholder("/"));
        assert!(!is_placeholder("0"));
        assert!(!is_placeholder("-1.5")); // negative number, not a dash
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading("3.4"), Some(3.4));
        assert_eq!(parse_reading(" 21 "), Some(21.0));
        assert_eq!(parse_reading("-99"), Some(-99.0)); // sentinel: caller's job
        assert_eq!(parse_reading("-"), None);
        assert_eq!(parse_reading("N/A"), None);
    }
}
