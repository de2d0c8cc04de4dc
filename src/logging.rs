/// Structured logging for the flight advisory service.
///
/// Context-rich log lines carrying the feed and the station/area being
/// worked on, with severity levels. Console output always; file output
/// when a log path is configured.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Observation,
    Forecast,
    Almanac,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Observation => write!(f, "OBS"),
            DataSource::Forecast => write!(f, "FCST"),
            DataSource::Almanac => write!(f, "ALMN"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - a station dropping out of the list is routine
    /// and the fallback chain exists for exactly this.
    Expected,
    /// Unexpected failure - indicates service degradation, an expired key,
    /// or a feed schema change.
    Unexpected,
    /// Unknown - cannot determine from the error text alone.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a feed failure based on its error text.
pub fn classify_feed_failure(error_message: &str) -> FailureType {
    // Station/area absent from the list: the fallback chain handles it.
    if error_message.contains("no station with a live reading")
        || error_message.contains("no matching forecast area")
    {
        FailureType::Expected
    }
    // Transport and schema problems point at the service or the key.
    else if error_message.contains("timed out")
        || error_message.contains("HTTP error")
        || error_message.contains("unreachable")
        || error_message.contains("malformed shape")
    {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        *LOGGER.lock().unwrap() = Some(Logger {
            min_level,
            log_file,
        });
    }

    fn log(&self, level: LogLevel, source: DataSource, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, subject_part, message
        );

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

pub fn info(source: DataSource, subject: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, source, subject, message);
    }
}

pub fn warn(source: DataSource, subject: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, source, subject, message);
    }
}

pub fn error(source: DataSource, subject: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, source, subject, message);
    }
}

pub fn debug(source: DataSource, subject: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, source, subject, message);
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a feed failure with automatic classification. Expected failures
/// (fallback-chain territory) log at debug, unexpected ones at error.
pub fn log_feed_failure(
    source: DataSource,
    subject: Option<&str>,
    operation: &str,
    err: &dyn std::error::Error,
) {
    let error_msg = err.to_string();
    let failure_type = classify_feed_failure(&error_msg);
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, subject, &message),
        FailureType::Unexpected => error(source, subject, &message),
        FailureType::Unknown => warn(source, subject, &message),
    }
}

// ---------------------------------------------------------------------------
// Reconcile Summary Logging
// ---------------------------------------------------------------------------

/// Log snapshot coverage after a reconcile run.
pub fn log_reconcile_summary(populated: usize, total: usize) {
    let message = format!("reconcile complete: {}/{} metrics populated", populated, total);

    if populated == total {
        info(DataSource::System, None, &message);
    } else if populated == 0 {
        error(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeedError;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_exhausted_fallback_chain_is_expected() {
        let err = FeedError::NoMatchingStation("左營 → 高雄".to_string());
        assert_eq!(classify_feed_failure(&err.to_string()), FailureType::Expected);
    }

    #[test]
    fn test_transport_failures_are_unexpected() {
        let err = FeedError::Timeout("request timed out after 10s".to_string());
        assert_eq!(classify_feed_failure(&err.to_string()), FailureType::Unexpected);

        let err = FeedError::BadStatus {
            status: 500,
            body: String::new(),
        };
        assert_eq!(classify_feed_failure(&err.to_string()), FailureType::Unexpected);
    }

    #[test]
    fn test_schema_drift_is_unexpected() {
        let err = FeedError::MalformedShape("no records wrapper".to_string());
        assert_eq!(classify_feed_failure(&err.to_string()), FailureType::Unexpected);
    }
}
