//! Perspective rectification of a candidate box into an upright patch

use crate::models::{Point, RotatedRect};
use crate::utils::geometry::PerspectiveTransform;

/// Upright greyscale patch cut out of the source frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Patch width in pixels
    pub width: usize,
    /// Patch height in pixels
    pub height: usize,
    /// Row-major luminance, `width * height` bytes
    pub data: Vec<u8>,
}

/// Warp the rotated box `rect` of `gray` into a `round(w) x round(h)` patch.
///
/// The box corners, in `RotatedRect::points` order (bottom-left, top-left,
/// top-right, bottom-right), land on `(0,0)`, `(w,0)`, `(w,h)`, `(0,h)`.
/// Each patch pixel samples the source bilinearly through the inverse
/// homography; samples outside the frame read as 0.
///
/// Returns `None` for a degenerate box.
pub fn rectify(gray: &[u8], width: usize, height: usize, rect: &RotatedRect) -> Option<Patch> {
    let out_w = rect.width.round() as usize;
    let out_h = rect.height.round() as usize;
    if out_w == 0 || out_h == 0 {
        return None;
    }

    let src = rect.points();
    let (w, h) = (out_w as f32, out_h as f32);
    let dst = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];

    let forward = PerspectiveTransform::from_points(&src, &dst)?;
    let inverse = forward.inverse()?;

    let mut data = Vec::with_capacity(out_w * out_h);
    for v in 0..out_h {
        for u in 0..out_w {
            let (x, y) = inverse.apply(u as f64, v as f64);
            data.push(sample_bilinear(gray, width, height, x, y));
        }
    }

    Some(Patch {
        width: out_w,
        height: out_h,
        data,
    })
}

#[inline]
fn pixel(gray: &[u8], width: usize, height: usize, x: i64, y: i64) -> f64 {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return 0.0;
    }
    gray[y as usize * width + x as usize] as f64
}

fn sample_bilinear(gray: &[u8], width: usize, height: usize, x: f64, y: f64) -> u8 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    let p00 = pixel(gray, width, height, xi, yi);
    let p10 = pixel(gray, width, height, xi + 1, yi);
    let p01 = pixel(gray, width, height, xi, yi + 1);
    let p11 = pixel(gray, width, height, xi + 1, yi + 1);

    let top = p00 + fx * (p10 - p00);
    let bottom = p01 + fx * (p11 - p01);
    (top + fy * (bottom - top)).round().clamp(0.0, 255.0) as u8
}
