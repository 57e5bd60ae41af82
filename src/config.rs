//! Candidate-filter thresholds.
//!
//! Values are carried explicitly into each locator call. `from_env` lets a
//! tool override them without recompiling (`QR_MIN_AREA`,
//! `QR_MIN_SQUARE_RATE`, `QR_FRAME_DIVISOR`). The finder-pattern count and
//! the 1:1:3:1:1 ratio checks are fixed and live next to the validators.

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Thresholds for the structural candidate filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorConfig {
    /// Contours enclosing less area than this (px²) are skipped
    pub min_contour_area: f32,
    /// Minimum `min(w, h) / max(w, h)` of the rotated box (exclusive)
    pub min_square_rate: f32,
    /// Box sides must be below `cols / divisor` and `rows / divisor`
    pub frame_divisor: usize,
}

impl LocatorConfig {
    /// Defaults overridden by any `QR_*` variables that parse
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_contour_area: parse_env_f32("QR_MIN_AREA", defaults.min_contour_area),
            min_square_rate: parse_env_f32("QR_MIN_SQUARE_RATE", defaults.min_square_rate)
                .clamp(0.0, 1.0),
            frame_divisor: parse_env_usize("QR_FRAME_DIVISOR", defaults.frame_divisor).max(1),
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_contour_area: 100.0,
            min_square_rate: 0.7,
            frame_divisor: 3,
        }
    }
}
