//! Flight-safety classification.
//!
//! Submodules:
//! - `verdict` — go/no-go thresholds and the classification function.
//! - `wind` — Beaufort force mapping for display.

pub mod verdict;
pub mod wind;
