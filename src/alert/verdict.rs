//! Flight-safety thresholds and verdict classification.

use crate::model::{FlightVerdict, ObservationSnapshot};

/// Go/no-go thresholds for small-multirotor operation at the flight site.
///
/// Wind limits track the flight envelope of the 250–500 g class; the
/// precipitation-probability limit grounds flights before rain becomes
/// likely rather than after it starts.
#[derive(Debug, Clone)]
pub struct FlightThresholds {
    /// Wind strictly above this is NO-GO, m/s.
    pub nogo_wind_ms: f64,
    /// Wind strictly above this (but within the NO-GO limit) is CAUTION.
    pub caution_wind_ms: f64,
    /// Precipitation probability strictly above this is NO-GO, percent.
    pub nogo_pop_pct: f64,
    /// Any measured nonzero one-hour precipitation grounds the flight
    /// regardless of the probability and wind readings.
    pub ground_on_measured_rain: bool,
}

impl Default for FlightThresholds {
    fn default() -> Self {
        FlightThresholds {
            nogo_wind_ms: 7.0,
            caution_wind_ms: 5.0,
            nogo_pop_pct: 30.0,
            ground_on_measured_rain: true,
        }
    }
}

/// Classify a reconciled snapshot into a verdict.
///
/// Total over every snapshot: a snapshot carrying neither a wind reading
/// nor a precipitation probability cannot be shown safe, so it classifies
/// NO-GO rather than panicking or guessing.
pub fn classify_flight_safety(
    snapshot: &ObservationSnapshot,
    thresholds: &FlightThresholds,
) -> FlightVerdict {
    let wind = snapshot.wind_speed_ms;
    let pop = snapshot.precip_probability_pct;

    if wind.is_none() && pop.is_none() {
        return FlightVerdict::NoGo;
    }

    if thresholds.ground_on_measured_rain
        && snapshot.precip_1hr_mm.is_some_and(|rain| rain > 0.0)
    {
        return FlightVerdict::NoGo;
    }

    if wind.is_some_and(|w| w > thresholds.nogo_wind_ms) {
        return FlightVerdict::NoGo;
    }
    if pop.is_some_and(|p| p > thresholds.nogo_pop_pct) {
        return FlightVerdict::NoGo;
    }
    if wind.is_some_and(|w| w > thresholds.caution_wind_ms) {
        return FlightVerdict::Caution;
    }

    FlightVerdict::Go
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
