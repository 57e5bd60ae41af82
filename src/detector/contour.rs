//! Border extraction over a binarized frame
use crate::models::{BitMatrix, Point, PointI};
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};

/// Which side of a light region a border runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// Outer boundary of a light region
    Outer,
    /// Boundary of a dark hole inside a light region
    Hole,
}

/// Ordered border pixels of one connected light region (or of one of its holes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Border pixels in tracing order
    pub points: Vec<PointI>,
    /// Outer border or hole border
    pub kind: BorderKind,
}

impl Contour {
    /// Points as floating point coordinates
    pub fn points_f32(&self) -> Vec<Point> {
        self.points.iter().copied().map(Point::from).collect()
    }
}

/// Trace every border (outer and hole, flat list) of the light regions.
///
/// Light pixels are foreground, matching a 0/255 threshold image where the
/// paper is white. Uses Suzuki-Abe border following. The frame is traced
/// inside a 1-pixel background margin so regions touching the image edge
/// (the page itself included) still get an outer border.
pub fn extract_contours(binary: &BitMatrix) -> Vec<Contour> {
    let (width, height) = (binary.width(), binary.height());
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let padded = GrayImage::from_fn(width as u32 + 2, height as u32 + 2, |x, y| {
        let inside = x >= 1 && y >= 1 && (x as usize) <= width && (y as usize) <= height;
        if inside && !binary.get(x as usize - 1, y as usize - 1) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    let (max_x, max_y) = (width as i32 - 1, height as i32 - 1);
    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| !c.points.is_empty())
        .map(|c| Contour {
            points: c
                .points
                .iter()
                .map(|p| PointI::new((p.x - 1).clamp(0, max_x), (p.y - 1).clamp(0, max_y)))
                .collect(),
            kind: match c.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            },
        })
        .collect()
}

/// Rasterize a closed contour polyline into `mask` with a 2-pixel stroke
pub fn draw_contour(mask: &mut BitMatrix, contour: &Contour) {
    let n = contour.points.len();
    for i in 0..n {
        let a = contour.points[i];
        let b = contour.points[(i + 1) % n];
        draw_segment(mask, a, b);
    }
}

fn draw_segment(mask: &mut BitMatrix, a: PointI, b: PointI) {
    // Bresenham
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (a.x, a.y);

    loop {
        stamp(mask, x, y);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[inline]
fn stamp(mask: &mut BitMatrix, x: i32, y: i32) {
    mask.set_signed(x, y);
    mask.set_signed(x + 1, y);
    mask.set_signed(x, y + 1);
    mask.set_signed(x + 1, y + 1);
}
