//! Position-box validation on rectified patches.
//!
//! Two independent 1-D signatures are checked: the 1:1:3:1:1 cross-section
//! along the patch's center row and a loose dark/light balance along the
//! upper half of its center column.

use crate::detector::rectify::Patch;
use crate::models::BitMatrix;
use crate::utils::binarization::otsu_binarize;

/// Module count across a finder pattern (1 + 1 + 3 + 1 + 1)
const PATTERN_MODULES: f32 = 7.0;

/// Widths of the five runs crossing a candidate along one scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisProfile {
    /// Outer dark ring, left side
    pub left_black: u32,
    /// Light ring, left side
    pub left_white: u32,
    /// Dark center box
    pub inner: u32,
    /// Light ring, right side
    pub right_white: u32,
    /// Outer dark ring, right side
    pub right_black: u32,
}

impl AxisProfile {
    /// Rescale the widths to module units: `width / sum * 7`, rounded half-up
    pub fn in_modules(&self) -> AxisProfile {
        let sum = (self.left_black
            + self.left_white
            + self.inner
            + self.right_white
            + self.right_black) as f32;
        if sum == 0.0 {
            return AxisProfile::default();
        }
        let scale = |w: u32| ((w as f32 / sum) * PATTERN_MODULES + 0.5) as u32;
        AxisProfile {
            left_black: scale(self.left_black),
            left_white: scale(self.left_white),
            inner: scale(self.inner),
            right_white: scale(self.right_white),
            right_black: scale(self.right_black),
        }
    }

    /// Whether the module-unit profile reads 1:1:3:1:1 (center 3 or 4)
    pub fn is_finder_ratio(&self) -> bool {
        let m = self.in_modules();
        (m.inner == 3 || m.inner == 4)
            && m.left_black == m.right_black
            && m.left_white == m.right_white
            && m.left_white == m.left_black
            && m.left_black == 1
    }
}

/// Run counts along the upper half of the center column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerticalProfile {
    /// Dark pixels from the center up to the first light pixel
    pub black: u32,
    /// Light pixels seen after that, up to the top edge
    pub white: u32,
}

impl VerticalProfile {
    /// `4 * black > white`
    pub fn is_balanced(&self) -> bool {
        self.black * 4 > self.white
    }
}

/// Measure the five runs on the center row of `binary`.
///
/// Walks outward from the center column on both sides at once until each
/// side has met its first light pixel. Gives up when a side gets within
/// `width / 8` of the left edge or reaches the last column first, or when
/// the center itself is light.
pub fn measure_horizontal(binary: &BitMatrix) -> Option<AxisProfile> {
    let width = binary.width() as isize;
    let height = binary.height();
    if width == 0 || height == 0 {
        return None;
    }
    let cy = height / 2;
    let cx = width / 2;
    let dark = |x: isize| binary.get(x as usize, cy);

    if !dark(cx) {
        return None;
    }

    let mut start = None;
    let mut end = None;
    let mut offset = 0;
    let (start, end) = loop {
        offset += 1;
        if cx - offset <= width / 8 || cx + offset >= width - 1 {
            return None;
        }
        if start.is_none() && !dark(cx - offset) {
            start = Some(cx - offset);
        }
        if end.is_none() && !dark(cx + offset) {
            end = Some(cx + offset);
        }
        if let (Some(s), Some(e)) = (start, end) {
            break (s, e);
        }
    };

    // Light ring: up to the next dark pixel, column 0 and the last column excluded
    let left_white = (1..=start)
        .rev()
        .find(|&col| dark(col))
        .map_or(0, |col| start - col);
    let right_white = (end..width - 1)
        .find(|&col| dark(col))
        .map_or(0, |col| col - end);

    // Outer ring: dark run until light or the patch border
    let right_black = (end + right_white..width)
        .take_while(|&col| dark(col))
        .count();
    let left_black = (1..=start - left_white)
        .rev()
        .take_while(|&col| dark(col))
        .count();

    Some(AxisProfile {
        left_black: left_black as u32,
        left_white: left_white as u32,
        inner: (end - start) as u32,
        right_white: right_white as u32,
        right_black: right_black as u32,
    })
}

/// Measure the center column from the middle row up to row 1.
///
/// Dark pixels count only until the first light pixel; light pixels count
/// for the rest of the walk.
pub fn measure_vertical(binary: &BitMatrix) -> VerticalProfile {
    let (width, height) = (binary.width(), binary.height());
    let mut profile = VerticalProfile::default();
    if width == 0 || height == 0 {
        return profile;
    }
    let cx = width / 2;
    let mut in_center = true;

    for row in (1..=height / 2).rev() {
        if binary.get(cx, row) {
            if in_center {
                profile.black += 1;
            }
        } else {
            in_center = false;
            profile.white += 1;
        }
    }
    profile
}

fn binarize_patch(patch: &Patch) -> BitMatrix {
    otsu_binarize(&patch.data, patch.width, patch.height)
}

/// Cross-section check along the center row of a rectified patch
pub fn horizontal_axis_check(patch: &Patch) -> bool {
    let binary = binarize_patch(patch);
    match measure_horizontal(&binary) {
        Some(profile) => {
            log::trace!(
                "horizontal profile {:?} -> modules {:?}",
                profile,
                profile.in_modules()
            );
            profile.is_finder_ratio()
        }
        None => false,
    }
}

/// Dark/light balance check along the center column of a rectified patch
pub fn vertical_axis_check(patch: &Patch) -> bool {
    let binary = binarize_patch(patch);
    let profile = measure_vertical(&binary);
    log::trace!("vertical profile {:?}", profile);
    profile.is_balanced()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square patch holding a nested-ring marker with `module` px modules,
    /// framed by `margin` light pixels.
    fn marker_patch(module: usize, margin: usize) -> Patch {
        let side = 7 * module + 2 * margin;
        let mut data = vec![255u8; side * side];
        for y in 0..side {
            for x in 0..side {
                let inside = |v: usize| v >= margin && v < margin + 7 * module;
                if !inside(x) || !inside(y) {
                    continue;
                }
                let mx = (x - margin) / module;
                let my = (y - margin) / module;
                let ring = mx.min(my).min(6 - mx).min(6 - my);
                if ring != 1 {
                    data[y * side + x] = 0;
                }
            }
        }
        Patch {
            width: side,
            height: side,
            data,
        }
    }

    fn row_matrix(runs: &[(bool, usize)]) -> BitMatrix {
        let width: usize = runs.iter().map(|r| r.1).sum();
        let mut m = BitMatrix::new(width, 3);
        let mut x = 0;
        for &(is_dark, len) in runs {
            for _ in 0..len {
                m.set(x, 1, is_dark);
                x += 1;
            }
        }
        m
    }

    #[test]
    fn canonical_ratio_accepted() {
        let profile = AxisProfile {
            left_black: 6,
            left_white: 6,
            inner: 19,
            right_white: 6,
            right_black: 6,
        };
        assert!(profile.is_finder_ratio());

        let wide = AxisProfile {
            inner: 25,
            left_black: 5,
            left_white: 5,
            right_white: 5,
            right_black: 5,
        };
        assert_eq!(wide.in_modules().inner, 4);
        assert!(wide.is_finder_ratio());
    }

    #[test]
    fn center_rounding_to_two_or_five_rejected() {
        let narrow = AxisProfile {
            left_black: 6,
            left_white: 6,
            inner: 10,
            right_white: 6,
            right_black: 6,
        };
        assert_eq!(narrow.in_modules().inner, 2);
        assert!(!narrow.is_finder_ratio());

        let fat = AxisProfile {
            left_black: 4,
            left_white: 4,
            inner: 30,
            right_white: 4,
            right_black: 4,
        };
        assert_eq!(fat.in_modules().inner, 5);
        assert!(!fat.is_finder_ratio());
    }

    #[test]
    fn asymmetric_rings_rejected() {
        let profile = AxisProfile {
            left_black: 2,
            left_white: 9,
            inner: 19,
            right_white: 6,
            right_black: 6,
        };
        assert!(!profile.is_finder_ratio());
    }

    #[test]
    fn measure_row_with_light_frame() {
        // light, 6 dark, 6 light, 18 dark, 6 light, 6 dark (to the border)
        let m = row_matrix(&[
            (false, 1),
            (true, 6),
            (false, 6),
            (true, 18),
            (false, 6),
            (true, 6),
        ]);
        let profile = measure_horizontal(&m).expect("profile");
        assert_eq!(
            profile,
            AxisProfile {
                left_black: 6,
                left_white: 6,
                inner: 19,
                right_white: 6,
                right_black: 6,
            }
        );
        assert!(profile.is_finder_ratio());
    }

    #[test]
    fn light_center_rejected() {
        let m = row_matrix(&[(true, 5), (false, 10), (true, 5)]);
        assert!(measure_horizontal(&m).is_none());
    }

    #[test]
    fn solid_dark_row_hits_the_edge() {
        let m = row_matrix(&[(false, 1), (true, 18)]);
        assert!(measure_horizontal(&m).is_none());
    }

    #[test]
    fn vertical_latch_stops_counting_dark() {
        let mut m = BitMatrix::new(3, 21);
        // rows 1..=4 dark (outer ring), 5..=6 light, 7..=10 dark (center)
        for row in (1..=4).chain(7..=10) {
            m.set(1, row, true);
        }
        let profile = measure_vertical(&m);
        assert_eq!(profile, VerticalProfile { black: 4, white: 2 });
        assert!(profile.is_balanced());

        assert!(!VerticalProfile { black: 1, white: 4 }.is_balanced());
        assert!(VerticalProfile { black: 1, white: 3 }.is_balanced());
    }

    #[test]
    fn rectified_marker_passes_both_axes() {
        let patch = marker_patch(6, 1);
        assert!(horizontal_axis_check(&patch));
        assert!(vertical_axis_check(&patch));
    }

    #[test]
    fn inner_box_without_rings_fails() {
        let side = 21;
        let mut data = vec![255u8; side * side];
        for y in 3..18 {
            for x in 3..18 {
                data[y * side + x] = 0;
            }
        }
        let patch = Patch {
            width: side,
            height: side,
            data,
        };
        assert!(!horizontal_axis_check(&patch));
    }
}
