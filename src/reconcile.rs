//! Multi-source weather reconciliation.
//!
//! [`WeatherReconciler`] issues the three feed fetches sequentially,
//! isolates their failures, and folds whatever survived into one
//! [`ObservationSnapshot`] plus a [`FlightVerdict`]. Assembly is the pure
//! function [`assemble_snapshot`], so everything past the transport is
//! testable without a network.
//!
//! Precedence per metric: the real-time observation wins for temperature
//! and one-hour precipitation; the forecast supplies apparent temperature,
//! precipitation probability and the text summary, and backs up
//! temperature when no station validated. Wind is the exception — the
//! maximum of observed and forecast, biasing toward the safer reading.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::alert::verdict::{FlightThresholds, classify_flight_safety};
use crate::config::FeedConfig;
use crate::ingest::forecast::{self, ForecastElement};
use crate::ingest::{almanac, obs};
use crate::logging::{self, DataSource};
use crate::model::{
    AstronomicalDay, FeedError, FlightVerdict, ForecastValue, ObservationSnapshot, StationRecord,
    TEMP_SENTINEL_C,
};
use crate::shape::parse_reading;

/// The output of one run: the reconciled snapshot, its verdict, and one
/// diagnostic line per degraded feed for the operator panel.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub snapshot: ObservationSnapshot,
    pub verdict: FlightVerdict,
    pub diagnostics: Vec<String>,
}

pub struct WeatherReconciler {
    client: reqwest::blocking::Client,
    config: FeedConfig,
}

impl WeatherReconciler {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Unreachable(format!("failed to build HTTP client: {}", e)))?;
        Ok(WeatherReconciler { client, config })
    }

    /// One full run against the current calendar date.
    pub fn fetch_and_reconcile(&self) -> ReconcileReport {
        self.fetch_and_reconcile_at(Local::now().date_naive())
    }

    /// One full run. `today` is injected so almanac date matching stays
    /// deterministic in tests.
    ///
    /// Never fails: each feed error is logged, recorded as a diagnostic,
    /// and converted into an absent contribution. The worst case is an
    /// empty snapshot, which classifies NO-GO.
    pub fn fetch_and_reconcile_at(&self, today: NaiveDate) -> ReconcileReport {
        let mut diagnostics = Vec::new();

        let observation = match obs::fetch_observation(&self.client, &self.config) {
            Ok(record) => {
                logging::info(
                    DataSource::Observation,
                    Some(&record.station_name),
                    "live station reading accepted",
                );
                Some(record)
            }
            Err(e) => {
                logging::log_feed_failure(DataSource::Observation, None, "fetch_observation", &e);
                diagnostics.push(format!(
                    "observation: {} (preference {})",
                    e,
                    self.config.station_preference.join(" → ")
                ));
                None
            }
        };

        let elements =
            match forecast::fetch_forecast(&self.client, &self.config, &ForecastElement::ALL) {
                Ok(elements) => {
                    logging::info(
                        DataSource::Forecast,
                        Some(&self.config.forecast_area),
                        &format!("{} elements resolved", elements.len()),
                    );
                    Some(elements)
                }
                Err(e) => {
                    logging::log_feed_failure(
                        DataSource::Forecast,
                        Some(&self.config.forecast_area),
                        "fetch_forecast",
                        &e,
                    );
                    diagnostics.push(format!("forecast: {}", e));
                    None
                }
            };

        let astronomy = match almanac::fetch_astronomy(&self.client, &self.config, today) {
            Ok(day) => Some(day),
            Err(e) => {
                logging::log_feed_failure(
                    DataSource::Almanac,
                    Some(&self.config.almanac_location),
                    "fetch_astronomy",
                    &e,
                );
                diagnostics.push(format!("almanac: {}", e));
                None
            }
        };

        let snapshot =
            assemble_snapshot(observation.as_ref(), elements.as_ref(), astronomy.as_ref());
        logging::log_reconcile_summary(
            snapshot.populated_metric_count(),
            ObservationSnapshot::METRIC_COUNT,
        );

        let thresholds = FlightThresholds {
            ground_on_measured_rain: self.config.ground_on_measured_rain,
            ..FlightThresholds::default()
        };
        let verdict = classify_flight_safety(&snapshot, &thresholds);

        ReconcileReport {
            snapshot,
            verdict,
            diagnostics,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot assembly
// ---------------------------------------------------------------------------

/// Resolved wind speed under the max-of-both policy: the larger of the
/// observed and forecast readings, the present one when only one side
/// reported, `None` when neither did.
pub fn resolve_wind_speed(observed: Option<f64>, forecast: Option<f64>) -> Option<f64> {
    match (observed, forecast) {
        (Some(o), Some(f)) => Some(o.max(f)),
        (Some(o), None) => Some(o),
        (None, Some(f)) => Some(f),
        (None, None) => None,
    }
}

fn numeric_element(
    elements: Option<&HashMap<ForecastElement, ForecastValue>>,
    kind: ForecastElement,
) -> Option<f64> {
    elements?.get(&kind).and_then(|v| parse_reading(&v.value))
}

/// Fold the surviving feed contributions into one flat snapshot.
pub fn assemble_snapshot(
    observation: Option<&StationRecord>,
    elements: Option<&HashMap<ForecastElement, ForecastValue>>,
    astronomy: Option<&AstronomicalDay>,
) -> ObservationSnapshot {
    let mut snapshot = ObservationSnapshot::default();

    if let Some(record) = observation {
        snapshot.station_name = Some(record.station_name.clone());
        snapshot.temperature_c = record.air_temperature_c.filter(|t| *t > TEMP_SENTINEL_C);
        snapshot.precip_1hr_mm = record.precip_1hr_mm;
        snapshot.precip_clamped = record.precip_clamped;
        snapshot.data_time = record.obs_time.clone();
    }

    if let Some(resolved) = elements {
        snapshot.forecast_area = resolved.values().next().map(|v| v.area_name.clone());
        if snapshot.temperature_c.is_none() {
            snapshot.temperature_c = numeric_element(elements, ForecastElement::Temperature);
        }
        snapshot.apparent_temperature_c =
            numeric_element(elements, ForecastElement::ApparentTemperature);
        snapshot.precip_probability_pct =
            numeric_element(elements, ForecastElement::PrecipProbability);
        snapshot.weather_description = resolved
            .get(&ForecastElement::Description)
            .map(|v| v.value.clone());
        if snapshot.data_time.is_none() {
            snapshot.data_time = resolved
                .values()
                .map(|v| v.start_time.clone())
                .find(|t| !t.is_empty());
        }
    }

    let observed_wind = observation.and_then(|r| r.wind_speed_ms);
    let forecast_wind = numeric_element(elements, ForecastElement::WindSpeed);
    snapshot.wind_speed_ms = resolve_wind_speed(observed_wind, forecast_wind);
    snapshot.wind_source = match (observed_wind, forecast_wind) {
        // Ties go to the station: a measurement beats a forecast.
        (Some(o), Some(f)) if f > o => snapshot.forecast_area.clone(),
        (Some(_), _) => snapshot.station_name.clone(),
        (None, Some(_)) => snapshot.forecast_area.clone(),
        (None, None) => None,
    };

    if let Some(day) = astronomy {
        snapshot.almanac_location = Some(day.location_name.clone());
        snapshot.sunrise = day.sunrise.clone();
        snapshot.sunset = day.sunset.clone();
    }

    snapshot
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
