//! qr_locator - geometric QR position-box locator
//!
//! Finds the three finder patterns of a QR code with a short, purely
//! geometric pipeline: Otsu threshold, border extraction, near-square
//! candidate filtering, perspective rectification and two 1-D ratio checks.
//! The pixels of the accepted boxes come back as one [`Detection`], from
//! which a bounding box around the whole code is derived.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Candidate-filter thresholds
pub mod config;
/// Detection stages (contours, candidates, rectification, validators)
pub mod detector;
/// Error type for checked entry points and tooling
pub mod error;
/// Core data structures (Detection, BitMatrix, RotatedRect, Point)
pub mod models;
/// Orchestration of one locator pass
pub mod pipeline;
/// Image loading, annotation and dataset evaluation helpers
pub mod tools;
/// Utility functions (grayscale, binarization, geometry)
pub mod utils;

pub use config::LocatorConfig;
pub use error::LocateError;
pub use models::{BitMatrix, Detection, FINDER_PATTERN_COUNT, Point, PointI, RotatedRect};

use pipeline::locate_in_gray;
use utils::grayscale::rgb_to_grayscale;

/// Locate a QR code in an RGB image with default thresholds
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// The accepted position-box pixels, empty when no QR code was found
pub fn locate(image: &[u8], width: usize, height: usize) -> Detection {
    Locator::new().locate(image, width, height)
}

/// Locate a QR code from a pre-computed grayscale image
pub fn locate_from_grayscale(image: &[u8], width: usize, height: usize) -> Detection {
    Locator::new().locate_from_grayscale(image, width, height)
}

/// Locator carrying its candidate-filter configuration
#[derive(Debug, Clone, Default)]
pub struct Locator {
    config: LocatorConfig,
}

impl Locator {
    /// Create a locator with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator with explicit thresholds
    pub fn with_config(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Create a locator whose thresholds honor `QR_*` environment overrides
    pub fn from_env() -> Self {
        Self::with_config(LocatorConfig::from_env())
    }

    /// Thresholds in use
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Locate a QR code in an RGB image
    ///
    /// The buffer must hold `width * height * 3` bytes; see
    /// [`Locator::try_locate`] for a checked variant.
    pub fn locate(&self, image: &[u8], width: usize, height: usize) -> Detection {
        let gray = rgb_to_grayscale(image, width, height);
        locate_in_gray(&gray, width, height, &self.config)
    }

    /// Locate a QR code in a grayscale image
    pub fn locate_from_grayscale(&self, image: &[u8], width: usize, height: usize) -> Detection {
        locate_in_gray(image, width, height, &self.config)
    }

    /// Locate after checking that the RGB buffer matches the dimensions
    pub fn try_locate(
        &self,
        image: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Detection, LocateError> {
        if width == 0 || height == 0 {
            return Err(LocateError::EmptyImage { width, height });
        }
        let expected = width * height * 3;
        if image.len() != expected {
            return Err(LocateError::BufferSize {
                expected,
                actual: image.len(),
            });
        }
        Ok(self.locate(image, width, height))
    }
}
