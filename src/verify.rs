//! Feed verification module
//!
//! Probes each configured CWA feed live to determine which are accessible
//! and returning usable data for the configured district. Run this after
//! a configuration change, or whenever the dashboard shows unexplained
//! gaps — it reports exactly what was tried and what failed.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::FeedConfig;
use crate::ingest::forecast::ForecastElement;
use crate::ingest::{almanac, forecast, get_json, obs};
use crate::model::FeedError;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<FeedVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedVerification {
    pub feed: String,
    pub status: VerificationStatus,
    /// Stations listed, elements resolved, or almanac days matched.
    pub sample_count: usize,
    pub detail: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Per-feed Verification
// ============================================================================

/// Observation feed: the station list must download, and at least one
/// candidate in the preference chain must carry a live reading. A list
/// that downloads but satisfies no candidate is a partial success — the
/// feed works, the chain does not.
pub fn verify_observation_feed(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
) -> FeedVerification {
    let mut result = FeedVerification {
        feed: "observation".to_string(),
        status: VerificationStatus::Failed,
        sample_count: 0,
        detail: None,
        error_message: None,
    };

    let stations = match get_json(client, &obs::build_obs_url(config))
        .and_then(|doc| obs::parse_obs_document(&doc))
    {
        Ok(stations) => stations,
        Err(e) => {
            result.error_message = Some(e.to_string());
            return result;
        }
    };

    result.sample_count = stations.len();
    match obs::select_station(&stations, &config.station_preference) {
        Some(chosen) => {
            result.status = VerificationStatus::Success;
            result.detail = Some(format!("live reading from {}", chosen.station_name));
        }
        None => {
            result.status = VerificationStatus::PartialSuccess;
            result.detail = Some(format!(
                "list downloaded but no live reading among {}",
                config.station_preference.join(" → ")
            ));
        }
    }
    result
}

/// Forecast feed: the configured area must resolve, and every element the
/// advisory consumes should yield a usable value. Missing elements
/// degrade to a partial success.
pub fn verify_forecast_feed(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
) -> FeedVerification {
    let mut result = FeedVerification {
        feed: "forecast".to_string(),
        status: VerificationStatus::Failed,
        sample_count: 0,
        detail: None,
        error_message: None,
    };

    match forecast::fetch_forecast(client, config, &ForecastElement::ALL) {
        Ok(resolved) => {
            result.sample_count = resolved.len();
            if let Some(value) = resolved.values().next() {
                result.detail = Some(format!("area {}", value.area_name));
            }
            result.status = if resolved.len() == ForecastElement::ALL.len() {
                VerificationStatus::Success
            } else if resolved.is_empty() {
                VerificationStatus::Failed
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            result.error_message = Some(e.to_string());
        }
    }
    result
}

/// Almanac feed: today's entry must match (relaxed matching included) and
/// carry at least one of the sunrise/sunset pair; both present is full
/// success.
pub fn verify_almanac_feed(
    client: &reqwest::blocking::Client,
    config: &FeedConfig,
) -> FeedVerification {
    let mut result = FeedVerification {
        feed: "almanac".to_string(),
        status: VerificationStatus::Failed,
        sample_count: 0,
        detail: None,
        error_message: None,
    };

    match almanac::fetch_astronomy(client, config, Local::now().date_naive()) {
        Ok(day) => {
            result.sample_count = 1;
            result.detail = Some(format!("matched {}", day.date));
            result.status = if day.sunrise.is_some() && day.sunset.is_some() {
                VerificationStatus::Success
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            result.error_message = Some(e.to_string());
        }
    }
    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(config: &FeedConfig) -> Result<VerificationReport, FeedError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| FeedError::Unreachable(format!("failed to build HTTP client: {}", e)))?;

    let results = vec![
        verify_observation_feed(&client, config),
        verify_forecast_feed(&client, config),
        verify_almanac_feed(&client, config),
    ];

    let working = results
        .iter()
        .filter(|r| r.status != VerificationStatus::Failed)
        .count();
    let summary = VerificationSummary {
        total: results.len(),
        working,
        failed: results.len() - working,
    };

    Ok(VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results,
        summary,
    })
}

pub fn print_summary(report: &VerificationReport) {
    println!("═══════════════════════════════════════════════════");
    println!(" FEED VERIFICATION — {}", report.timestamp);
    println!("═══════════════════════════════════════════════════");

    for result in &report.results {
        let glyph = match result.status {
            VerificationStatus::Success => "✓",
            VerificationStatus::PartialSuccess => "⚠",
            VerificationStatus::Failed => "✗",
        };
        let detail = result
            .detail
            .as_deref()
            .or(result.error_message.as_deref())
            .unwrap_or("no detail");
        println!(
            " {} {:<12} {} ({} samples)",
            glyph, result.feed, detail, result.sample_count
        );
    }

    println!("───────────────────────────────────────────────────");
    println!(
        " {}/{} feeds working ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );
    println!("═══════════════════════════════════════════════════");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
