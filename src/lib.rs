//! Drone flight-safety advisory for the Zuoying district of Kaohsiung.
//!
//! One run is a one-shot pipeline: fetch three CWA open-data feeds
//! (real-time station observations, township forecasts, sunrise/sunset
//! almanac), reconcile their inconsistently shaped JSON into a single
//! [`model::ObservationSnapshot`], classify it into a
//! [`model::FlightVerdict`], and render a console dashboard.
//!
//! Feed failures are isolated per feed: a dead forecast endpoint still
//! leaves the observation- and almanac-derived fields populated, and the
//! dashboard renders gaps rather than crashing.

pub mod alert;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod shape;
pub mod stations;
pub mod verify;
