//! Beaufort wind-force mapping for display.

/// Beaufort force boundaries in m/s. A wind of `BOUNDARIES[n]` or more is
/// at least force `n + 1`; anything below 0.3 m/s is force 0 (calm).
const FORCE_BOUNDARIES_MS: [f64; 7] = [0.3, 1.5, 3.3, 5.4, 7.9, 10.7, 13.8];

/// Categorical wind force for a wind-speed magnitude.
pub fn beaufort_force(wind_ms: f64) -> u8 {
    FORCE_BOUNDARIES_MS
        .iter()
        .take_while(|boundary| wind_ms >= **boundary)
        .count() as u8
}

/// Short operator label for a force band.
pub fn force_label(force: u8) -> &'static str {
    match force {
        0 => "calm",
        1 => "light air",
        2 => "light breeze",
        3 => "gentle breeze",
        4 => "moderate breeze",
        5 => "fresh breeze",
        6 => "strong breeze",
        _ => "near gale or stronger",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calm_below_first_boundary() {
        assert_eq!(beaufort_force(0.0), 0);
        assert_eq!(beaufort_force(0.2), 0);
    }

    #[test]
    fn test_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(beaufort_force(0.3), 1);
        assert_eq!(beaufort_force(1.5), 2);
        assert_eq!(beaufort_force(3.3), 3);
        assert_eq!(beaufort_force(5.4), 4);
        assert_eq!(beaufort_force(7.9), 5);
        assert_eq!(beaufort_force(10.7), 6);
        assert_eq!(beaufort_force(13.8), 7);
    }

    #[test]
    fn test_values_inside_bands() {
        assert_eq!(beaufort_force(2.0), 2);
        assert_eq!(beaufort_force(5.0), 3);
        assert_eq!(beaufort_force(7.0), 4);
        assert_eq!(beaufort_force(25.0), 7);
    }

    #[test]
    fn test_every_force_has_a_label() {
        for force in 0..=7 {
            assert!(!force_label(force).is_empty());
        }
    }
}
