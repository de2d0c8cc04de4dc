/// Core data types for the Zuoying flight advisory service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies — only types.

// ---------------------------------------------------------------------------
// CWA dataset ids
// ---------------------------------------------------------------------------

/// Automatic weather station observations (real-time, all of Taiwan).
pub const DATASET_OBSERVATION: &str = "O-A0001-001";

/// Township-granularity forecast for Kaohsiung City.
pub const DATASET_FORECAST: &str = "F-D0047-091";

/// Sunrise/sunset almanac, addressed by county/city name.
pub const DATASET_ALMANAC: &str = "A-B0062-001";

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Temperature readings at or below this value mean the sensor slot is
/// unpopulated or faulty, not a measurement. CWA stations report -99 or
/// -990 in dead slots.
pub const TEMP_SENTINEL_C: f64 = -50.0;

// ---------------------------------------------------------------------------
// Feed record types
// ---------------------------------------------------------------------------

/// A real-time observation from one physical sensor site.
///
/// Corresponds to one entry in the observation feed's station list. Fields
/// the station did not report (or reported as a sentinel) are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station_name: String,
    pub station_id: Option<String>,
    /// ISO 8601 as reported, e.g. "2026-08-06T10:00:00+08:00".
    pub obs_time: Option<String>,
    pub air_temperature_c: Option<f64>,
    pub precip_1hr_mm: Option<f64>,
    /// True when the wire precipitation was negative and clamped to zero.
    pub precip_clamped: bool,
    pub wind_speed_ms: Option<f64>,
}

impl StationRecord {
    /// A record only counts as a live reading when its temperature is a
    /// real measurement, not the offline sentinel.
    pub fn has_valid_temperature(&self) -> bool {
        matches!(self.air_temperature_c, Some(t) if t > TEMP_SENTINEL_C)
    }
}

/// One resolved forecast value: the first usable entry of an element's
/// time-ordered sequence, plus where and when it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastValue {
    pub value: String,
    /// Name of the administrative area that supplied the value.
    pub area_name: String,
    /// Start of the forecast window the value belongs to.
    pub start_time: String,
}

/// Sunrise/sunset times for one location on one calendar day.
///
/// Either time may be `None` if the almanac entry did not carry the
/// matching parameter; a day with neither is rejected at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct AstronomicalDay {
    pub location_name: String,
    /// The almanac's own date string — may disagree with the current year.
    pub date: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

// ---------------------------------------------------------------------------
// Reconciled output
// ---------------------------------------------------------------------------

/// The flat record consumed by rendering: one field per dashboard metric,
/// plus the source labels naming which station/area supplied each feed's
/// contribution. Built fresh on every run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSnapshot {
    pub temperature_c: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    /// Resolved wind speed: max of observed and forecast (see
    /// `reconcile::resolve_wind_speed`).
    pub wind_speed_ms: Option<f64>,
    /// Name of the station or forecast area that won the wind resolution.
    pub wind_source: Option<String>,
    pub precip_probability_pct: Option<f64>,
    pub precip_1hr_mm: Option<f64>,
    /// Carried through from `StationRecord::precip_clamped`.
    pub precip_clamped: bool,
    pub weather_description: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    /// Timestamp of the data the snapshot was built from (observation time
    /// when available, else the forecast window start).
    pub data_time: Option<String>,
    pub station_name: Option<String>,
    pub forecast_area: Option<String>,
    pub almanac_location: Option<String>,
}

impl ObservationSnapshot {
    /// True when no feed contributed anything usable.
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none()
            && self.apparent_temperature_c.is_none()
            && self.wind_speed_ms.is_none()
            && self.precip_probability_pct.is_none()
            && self.precip_1hr_mm.is_none()
            && self.weather_description.is_none()
            && self.sunrise.is_none()
            && self.sunset.is_none()
    }

    /// How many of the eight dashboard metrics are populated. Used for the
    /// post-reconcile coverage log line.
    pub fn populated_metric_count(&self) -> usize {
        [
            self.temperature_c.is_some(),
            self.apparent_temperature_c.is_some(),
            self.wind_speed_ms.is_some(),
            self.precip_probability_pct.is_some(),
            self.precip_1hr_mm.is_some(),
            self.weather_description.is_some(),
            self.sunrise.is_some(),
            self.sunset.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    pub const METRIC_COUNT: usize = 8;
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Flight-safety classification, in descending order of permissiveness.
///
/// Always recomputed from a snapshot, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightVerdict {
    Go,
    Caution,
    NoGo,
}

impl std::fmt::Display for FlightVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightVerdict::Go => write!(f, "GO"),
            FlightVerdict::Caution => write!(f, "CAUTION"),
            FlightVerdict::NoGo => write!(f, "NO-GO"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing a CWA feed.
///
/// Every variant is recovered at the reconciliation layer by treating the
/// affected feed's contribution as absent; none of them aborts a run.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Network-layer failure before any response arrived.
    Unreachable(String),
    /// The request exceeded the configured per-request timeout.
    Timeout(String),
    /// Non-2xx HTTP response. The body is kept for diagnostics only.
    BadStatus { status: u16, body: String },
    /// An expected key path was missing under every tried casing variant.
    MalformedShape(String),
    /// A field was present but non-numeric, negative where disallowed, or
    /// a placeholder string.
    InvalidValue(String),
    /// No station in the preference chain validated.
    NoMatchingStation(String),
    /// No forecast area matched and the fallback policy was exhausted.
    NoMatchingArea(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Unreachable(msg) => write!(f, "feed unreachable: {}", msg),
            FeedError::Timeout(msg) => write!(f, "feed timed out: {}", msg),
            FeedError::BadStatus { status, body } => {
                write!(f, "HTTP error {}: {}", status, body)
            }
            FeedError::MalformedShape(msg) => write!(f, "malformed shape: {}", msg),
            FeedError::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
            FeedError::NoMatchingStation(tried) => {
                write!(f, "no station with a live reading (tried {})", tried)
            }
            FeedError::NoMatchingArea(tried) => {
                write!(f, "no matching forecast area (tried {})", tried)
            }
        }
    }
}

impl std::error::Error for FeedError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
