use crate::config::LocatorConfig;
use crate::detector::candidate::filter_candidate;
use crate::detector::contour::{Contour, draw_contour, extract_contours};
use crate::detector::finder::{horizontal_axis_check, vertical_axis_check};
use crate::detector::rectify::rectify;
use crate::models::{BitMatrix, Detection, FINDER_PATTERN_COUNT, RotatedRect};
use crate::utils::binarization::otsu_binarize;

/// What happened to one contour that survived the structural filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Passed both axis checks
    Accepted,
    /// Box could not be rectified (degenerate corners)
    Unrectifiable,
    /// Center row is not a 1:1:3:1:1 cross-section
    HorizontalRejected,
    /// Center column failed the dark/light balance
    VerticalRejected,
}

/// Per-candidate diagnostic record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateReport {
    /// Index of the contour in extraction order
    pub contour_index: usize,
    /// Minimum-area box of the contour
    pub rect: RotatedRect,
    /// Validation result
    pub outcome: CandidateOutcome,
}

/// Full trace of one locator pass, for tooling
#[derive(Debug, Clone)]
pub struct LocateTrace {
    /// Contours extracted from the binarized frame
    pub contour_count: usize,
    /// Every contour that passed the structural filter
    pub candidates: Vec<CandidateReport>,
    /// Final result
    pub detection: Detection,
}

fn validate(gray: &[u8], width: usize, height: usize, rect: &RotatedRect) -> CandidateOutcome {
    let Some(patch) = rectify(gray, width, height, rect) else {
        return CandidateOutcome::Unrectifiable;
    };
    if !horizontal_axis_check(&patch) {
        return CandidateOutcome::HorizontalRejected;
    }
    if !vertical_axis_check(&patch) {
        return CandidateOutcome::VerticalRejected;
    }
    CandidateOutcome::Accepted
}

/// Structural filter + rectification + axis checks over every contour
pub(crate) fn evaluate_candidates(
    gray: &[u8],
    width: usize,
    height: usize,
    contours: &[Contour],
    config: &LocatorConfig,
) -> Vec<CandidateReport> {
    contours
        .iter()
        .enumerate()
        .filter_map(|(contour_index, contour)| {
            let rect = filter_candidate(contour, width, height, config)?;
            let outcome = validate(gray, width, height, &rect);
            log::trace!(
                "contour {}: box {:.1}x{:.1} at ({:.1}, {:.1}) -> {:?}",
                contour_index,
                rect.width,
                rect.height,
                rect.center.x,
                rect.center.y,
                outcome
            );
            Some(CandidateReport {
                contour_index,
                rect,
                outcome,
            })
        })
        .collect()
}

/// Run the locator on a grayscale frame and keep the per-candidate trace.
///
/// Accepted contours are drawn into a fresh accumulator mask. Exactly
/// [`FINDER_PATTERN_COUNT`] acceptances yield the mask pixels; any other
/// count yields an empty detection carrying the count.
pub fn locate_traced(gray: &[u8], width: usize, height: usize, config: &LocatorConfig) -> LocateTrace {
    if width == 0 || height == 0 {
        return LocateTrace {
            contour_count: 0,
            candidates: Vec::new(),
            detection: Detection::failed(0),
        };
    }

    let binary = otsu_binarize(gray, width, height);
    let contours = extract_contours(&binary);
    let candidates = evaluate_candidates(gray, width, height, &contours, config);

    let mut accumulator = BitMatrix::new(width, height);
    let mut accepted = 0usize;
    for report in &candidates {
        if report.outcome == CandidateOutcome::Accepted {
            accepted += 1;
            log::debug!("contour {} is a position box", report.contour_index);
            draw_contour(&mut accumulator, &contours[report.contour_index]);
        }
    }

    let detection = if accepted == FINDER_PATTERN_COUNT {
        Detection::found(accumulator.set_points())
    } else {
        log::debug!("position boxes found: {}, detection failed", accepted);
        Detection::failed(accepted)
    };

    LocateTrace {
        contour_count: contours.len(),
        candidates,
        detection,
    }
}

/// Run the locator on a grayscale frame
pub fn locate_in_gray(gray: &[u8], width: usize, height: usize, config: &LocatorConfig) -> Detection {
    locate_traced(gray, width, height, config).detection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_has_no_candidates() {
        let gray = vec![255u8; 64 * 64];
        let trace = locate_traced(&gray, 64, 64, &LocatorConfig::default());
        assert!(trace.candidates.is_empty());
        assert!(trace.detection.is_empty());
        assert_eq!(trace.detection.accepted, 0);
    }

    #[test]
    fn zero_sized_frame_is_a_failed_detection() {
        let d = locate_in_gray(&[], 0, 0, &LocatorConfig::default());
        assert_eq!(d, Detection::failed(0));
    }

    #[test]
    fn plain_dark_square_is_rejected_by_axis_checks() {
        let (w, h) = (120, 120);
        let mut gray = vec![255u8; w * h];
        for y in 20..50 {
            for x in 20..50 {
                gray[y * w + x] = 0;
            }
        }
        let trace = locate_traced(&gray, w, h, &LocatorConfig::default());
        assert!(!trace.candidates.is_empty());
        assert!(
            trace
                .candidates
                .iter()
                .all(|c| c.outcome != CandidateOutcome::Accepted)
        );
        assert!(trace.detection.is_empty());
    }
}
