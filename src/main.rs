//! One-shot flight advisory runner.
//!
//! No arguments runs the full fetch, reconcile and render cycle once; the
//! single `verify` argument probes the configured feeds instead. Partial
//! data is a normal outcome and still exits 0 — only a missing API key or
//! an unreadable config file is a startup error.

use flymon_service::config::FeedConfig;
use flymon_service::logging::{self, DataSource, LogLevel};
use flymon_service::reconcile::WeatherReconciler;
use flymon_service::{render, verify};

const CONFIG_PATH: &str = "./flymon.toml";

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, None);

    let mut config = match FeedConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to read {}: {}", CONFIG_PATH, e);
            std::process::exit(1);
        }
    };

    // The environment wins over the config file for the credential.
    if let Ok(key) = std::env::var("CWA_API_KEY") {
        config.api_key = key;
    }
    if config.api_key.is_empty() {
        eprintln!(
            "No API key: set CWA_API_KEY (or api_key in {}) to a CWA open-data key",
            CONFIG_PATH
        );
        std::process::exit(1);
    }

    if std::env::args().nth(1).as_deref() == Some("verify") {
        match verify::run_full_verification(&config) {
            Ok(report) => verify::print_summary(&report),
            Err(e) => {
                logging::error(DataSource::System, None, &format!("verification failed: {}", e));
                std::process::exit(1);
            }
        }
        return;
    }

    let reconciler = match WeatherReconciler::new(config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let report = reconciler.fetch_and_reconcile();
    render::print_dashboard(&report);
}
