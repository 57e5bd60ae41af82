//! Utility functions for image processing
//!
//! - Grayscale conversion (RGB to luminance)
//! - Binarization (Otsu's method and fixed threshold)
//! - Geometry (homographies, convex hulls, rotated bounding boxes)

/// Otsu and fixed-level thresholding
pub mod binarization;
/// Homographies, hulls and rotated boxes
pub mod geometry;
/// RGB to luminance
pub mod grayscale;
