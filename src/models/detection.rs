use crate::models::{Point, PointI, RotatedRect};
use crate::utils::geometry::min_area_rect;

/// Number of position boxes a QR code carries (three of its four corners).
///
/// This is a property of the symbol, not a tuning knob.
pub const FINDER_PATTERN_COUNT: usize = 3;

/// Outcome of one locator call.
///
/// `points` holds the pixels of the accepted position boxes and is empty
/// unless exactly [`FINDER_PATTERN_COUNT`] boxes were accepted. `accepted`
/// is reported either way as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detection {
    /// Accepted position-box pixels, row-major order
    pub points: Vec<PointI>,
    /// How many candidates passed both axis checks
    pub accepted: usize,
}

impl Detection {
    /// Successful detection over the given pixels
    pub fn found(points: Vec<PointI>) -> Self {
        Self {
            points,
            accepted: FINDER_PATTERN_COUNT,
        }
    }

    /// Failed detection: no points, only the accepted count
    pub fn failed(accepted: usize) -> Self {
        Self {
            points: Vec::new(),
            accepted,
        }
    }

    /// True when no QR code was located
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Minimum-area rotated rectangle around the accepted pixels
    pub fn bounding_box(&self) -> Option<RotatedRect> {
        if self.points.is_empty() {
            return None;
        }
        let pts: Vec<Point> = self.points.iter().copied().map(Point::from).collect();
        min_area_rect(&pts)
    }
}
