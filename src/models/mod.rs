//! Core data structures

/// Locator result
pub mod detection;
/// Packed binary image
pub mod matrix;
/// Integer and float points
pub mod point;
/// Rotated rectangle
pub mod rotated_rect;

pub use detection::{Detection, FINDER_PATTERN_COUNT};
pub use matrix::BitMatrix;
pub use point::{Point, PointI};
pub use rotated_rect::RotatedRect;
