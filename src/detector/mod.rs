//! Position-box detection stages
//!
//! - Border extraction over the binarized frame
//! - Structural candidate filter (area, squareness, size)
//! - Perspective rectification of each candidate
//! - 1:1:3:1:1 axis validation on the rectified patch

/// Near-square, small-enough contour filter
pub mod candidate;
/// Suzuki-Abe border extraction and contour rasterization
pub mod contour;
/// Axis-profile validators for rectified candidates
pub mod finder;
/// Perspective warp of a rotated box into an upright patch
pub mod rectify;
