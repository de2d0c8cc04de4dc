//! Console dashboard for the advisory output.
//!
//! Pure sink: receives a finished [`ReconcileReport`] and formats it.
//! Absent metrics render as gaps ("N/A", "--:--"), never as errors — a
//! partially populated dashboard is the designed failure mode.

use crate::alert::wind::{beaufort_force, force_label};
use crate::model::FlightVerdict;
use crate::reconcile::ReconcileReport;

const GAP_NUMERIC: &str = "N/A";
const GAP_TIME: &str = "--:--";

pub fn print_dashboard(report: &ReconcileReport) {
    print!("{}", format_dashboard(report));
}

pub fn format_dashboard(report: &ReconcileReport) -> String {
    let snapshot = &report.snapshot;
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════════\n");
    out.push_str(" ZUOYING FLIGHT ADVISORY\n");
    out.push_str("═══════════════════════════════════════════════════\n");

    match report.verdict {
        FlightVerdict::Go => out.push_str(" ✓ GO — conditions within limits\n"),
        FlightVerdict::Caution => {
            out.push_str(" ⚠ CAUTION — marginal wind, stay low and close\n")
        }
        FlightVerdict::NoGo => out.push_str(" ✗ NO-GO — do not fly\n"),
    }
    if let Some(time) = &snapshot.data_time {
        out.push_str(&format!(" Data time: {}\n", tidy_timestamp(time)));
    }
    out.push('\n');

    out.push_str(&format!(
        " Temperature:        {}\n",
        celsius(snapshot.temperature_c)
    ));
    out.push_str(&format!(
        " Apparent temp:      {}\n",
        celsius(snapshot.apparent_temperature_c)
    ));
    match snapshot.wind_speed_ms {
        Some(wind) => {
            let force = beaufort_force(wind);
            out.push_str(&format!(
                " Wind:               {:.1} m/s (force {}, {})\n",
                wind,
                force,
                force_label(force)
            ));
        }
        None => out.push_str(&format!(" Wind:               {}\n", GAP_NUMERIC)),
    }
    out.push_str(&format!(
        " Rain probability:   {}\n",
        percent(snapshot.precip_probability_pct)
    ));
    match snapshot.precip_1hr_mm {
        Some(rain) => {
            let clamp_note = if snapshot.precip_clamped {
                " (sensor offline, clamped)"
            } else {
                ""
            };
            out.push_str(&format!(
                " Rain, last hour:    {:.1} mm{}\n",
                rain, clamp_note
            ));
        }
        None => out.push_str(&format!(" Rain, last hour:    {}\n", GAP_NUMERIC)),
    }
    out.push_str(&format!(
        " Sunrise / sunset:   {} / {}\n",
        snapshot.sunrise.as_deref().unwrap_or(GAP_TIME),
        snapshot.sunset.as_deref().unwrap_or(GAP_TIME)
    ));

    if let Some(description) = &snapshot.weather_description {
        out.push_str(&format!("\n Summary: {}\n", description));
    }

    // Source attribution: which station/area each feed's fields came from.
    out.push('\n');
    if let Some(name) = &snapshot.station_name {
        out.push_str(&format!(" Station:  {}\n", name));
    }
    if let Some(name) = &snapshot.forecast_area {
        out.push_str(&format!(" Forecast: {}\n", name));
    }
    if let Some(name) = &snapshot.wind_source {
        out.push_str(&format!(" Wind via: {}\n", name));
    }
    if let Some(name) = &snapshot.almanac_location {
        out.push_str(&format!(" Almanac:  {}\n", name));
    }

    if !report.diagnostics.is_empty() {
        out.push_str("───────────────────────────────────────────────────\n");
        out.push_str(" Degraded feeds:\n");
        for line in &report.diagnostics {
            out.push_str(&format!("   ✗ {}\n", line));
        }
    }
    out.push_str("═══════════════════════════════════════════════════\n");

    out
}

fn celsius(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1} °C", v),
        None => GAP_NUMERIC.to_string(),
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0} %", v),
        None => GAP_NUMERIC.to_string(),
    }
}

/// "2026-08-06T12:00:00+08:00" → "2026-08-06 12:00:00".
fn tidy_timestamp(raw: &str) -> String {
    let spaced = raw.replace('T', " ");
    spaced
        .split_once('+')
        .map(|(kept, _)| kept.to_string())
        .unwrap_or(spaced)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
