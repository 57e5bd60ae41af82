use crate::models::Point;

/// Rotated rectangle: center, side lengths and rotation in degrees.
///
/// `width` runs along the direction `(cos angle, sin angle)`, `height` along
/// the perpendicular `(-sin angle, cos angle)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotatedRect {
    /// Rectangle center
    pub center: Point,
    /// Side length along the rotated x axis
    pub width: f32,
    /// Side length along the rotated y axis
    pub height: f32,
    /// Rotation in degrees, `[0, 90)` when produced by `min_area_rect`
    pub angle: f32,
}

impl RotatedRect {
    /// Create a new rotated rectangle
    pub fn new(center: Point, width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// Four corners in the order bottom-left, top-left, top-right,
    /// bottom-right (named for `angle == 0` in image coordinates).
    ///
    /// The rectifier depends on this exact order.
    pub fn points(&self) -> [Point; 4] {
        let theta = (self.angle as f64).to_radians();
        let b = theta.cos() * 0.5;
        let a = theta.sin() * 0.5;
        let (cx, cy) = (self.center.x as f64, self.center.y as f64);
        let (w, h) = (self.width as f64, self.height as f64);

        let p0 = (cx - a * h - b * w, cy + b * h - a * w);
        let p1 = (cx + a * h - b * w, cy - b * h - a * w);
        let p2 = (2.0 * cx - p0.0, 2.0 * cy - p0.1);
        let p3 = (2.0 * cx - p1.0, 2.0 * cy - p1.1);

        [p0, p1, p2, p3].map(|(x, y)| Point::new(x as f32, y as f32))
    }

    /// Ratio of the shorter side to the longer one; 0 for degenerate rects
    pub fn squareness(&self) -> f32 {
        let longer = self.width.max(self.height);
        if longer <= 0.0 {
            return 0.0;
        }
        self.width.min(self.height) / longer
    }

    /// Area of the rectangle
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether `p` lies inside the rectangle grown by `tolerance` on every side
    pub fn contains(&self, p: &Point, tolerance: f32) -> bool {
        let theta = self.angle.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        u.abs() <= self.width * 0.5 + tolerance && v.abs() <= self.height * 0.5 + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, x: f32, y: f32) -> bool {
        (a.x - x).abs() < 1e-4 && (a.y - y).abs() < 1e-4
    }

    #[test]
    fn test_points_order_unrotated() {
        let rect = RotatedRect::new(Point::new(10.0, 20.0), 4.0, 6.0, 0.0);
        let [bl, tl, tr, br] = rect.points();
        assert!(close(bl, 8.0, 23.0));
        assert!(close(tl, 8.0, 17.0));
        assert!(close(tr, 12.0, 17.0));
        assert!(close(br, 12.0, 23.0));
    }

    #[test]
    fn test_points_rotated_quarter_turn() {
        // A quarter turn swaps the roles of width and height
        let rect = RotatedRect::new(Point::new(0.0, 0.0), 4.0, 2.0, 90.0);
        let pts = rect.points();
        for p in &pts {
            assert!((p.x.abs() - 1.0).abs() < 1e-4);
            assert!((p.y.abs() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_squareness_and_contains() {
        let rect = RotatedRect::new(Point::new(0.0, 0.0), 10.0, 8.0, 30.0);
        assert!((rect.squareness() - 0.8).abs() < 1e-6);
        assert!(rect.contains(&Point::new(0.0, 0.0), 0.0));
        assert!(!rect.contains(&Point::new(20.0, 0.0), 0.5));
        for corner in rect.points() {
            assert!(rect.contains(&corner, 1e-3));
        }
    }
}
