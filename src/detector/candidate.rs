use crate::config::LocatorConfig;
use crate::detector::contour::Contour;
use crate::models::RotatedRect;
use crate::utils::geometry::{min_area_rect, polygon_area};

/// Structural pre-filter for position-box candidates.
///
/// Keeps contours that enclose enough area and whose minimum-area rotated
/// box is near-square and small relative to the frame (a box spanning a
/// third of the image is the page border, not a marker). Returns the box for
/// survivors; everything else is silently dropped.
pub fn filter_candidate(
    contour: &Contour,
    width: usize,
    height: usize,
    config: &LocatorConfig,
) -> Option<RotatedRect> {
    let points = contour.points_f32();
    if polygon_area(&points) < config.min_contour_area {
        return None;
    }

    let rect = min_area_rect(&points)?;
    let divisor = config.frame_divisor.max(1);
    let max_w = (width / divisor) as f32;
    let max_h = (height / divisor) as f32;

    if rect.squareness() > config.min_square_rate && rect.width < max_w && rect.height < max_h {
        Some(rect)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::contour::BorderKind;
    use crate::models::PointI;

    fn rect_contour(x0: i32, y0: i32, w: i32, h: i32) -> Contour {
        let mut points = Vec::new();
        for x in x0..x0 + w {
            points.push(PointI::new(x, y0));
        }
        for y in y0..y0 + h {
            points.push(PointI::new(x0 + w, y));
        }
        for x in (x0 + 1..=x0 + w).rev() {
            points.push(PointI::new(x, y0 + h));
        }
        for y in (y0 + 1..=y0 + h).rev() {
            points.push(PointI::new(x0, y));
        }
        Contour {
            points,
            kind: BorderKind::Hole,
        }
    }

    #[test]
    fn accepts_small_square() {
        let config = LocatorConfig::default();
        let rect = filter_candidate(&rect_contour(10, 10, 40, 40), 300, 300, &config)
            .expect("square candidate");
        assert!((rect.width - 40.0).abs() < 1e-3);
        assert!((rect.center.x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_tiny_area() {
        let config = LocatorConfig::default();
        assert!(filter_candidate(&rect_contour(10, 10, 9, 9), 300, 300, &config).is_none());
    }

    #[test]
    fn rejects_elongated_box() {
        let config = LocatorConfig::default();
        // 20 / 40 = 0.5 is well below the squareness floor
        assert!(filter_candidate(&rect_contour(10, 10, 40, 20), 300, 300, &config).is_none());
    }

    #[test]
    fn rejects_box_spanning_a_third_of_the_frame() {
        let config = LocatorConfig::default();
        assert!(filter_candidate(&rect_contour(0, 0, 100, 100), 300, 300, &config).is_none());
        assert!(filter_candidate(&rect_contour(0, 0, 99, 99), 300, 300, &config).is_some());
    }
}
