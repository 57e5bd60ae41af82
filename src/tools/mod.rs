//! Tooling around the locator: image I/O, annotation, stats and dataset
//! evaluation. Used by the `qrtool` binary.

use crate::error::LocateError;
use crate::models::{BitMatrix, RotatedRect};
use crate::utils::binarization::otsu_binarize;
use crate::utils::grayscale::rgb_to_grayscale;
use crate::{Detection, Locator};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Colour of the bounding-box outline
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Load an image as RGB
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, LocateError> {
    let path = path.as_ref();
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| LocateError::Load {
            path: path.to_path_buf(),
            source,
        })
}

/// Save an RGB image, format chosen from the extension
pub fn save_rgb<P: AsRef<Path>>(img: &RgbImage, path: P) -> Result<(), LocateError> {
    let path = path.as_ref();
    img.save(path).map_err(|source| LocateError::Save {
        path: path.to_path_buf(),
        source,
    })
}

/// Run a locator over a decoded RGB image
pub fn locate_image(locator: &Locator, img: &RgbImage) -> Detection {
    locator.locate(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Outline `rect` on `img` with a 2-pixel line
pub fn draw_bounding_box(img: &mut RgbImage, rect: &RotatedRect) {
    let corners = rect.points();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        draw_line_segment_mut(img, (a.x, a.y), (b.x, b.y), BOX_COLOR);
        draw_line_segment_mut(img, (a.x + 1.0, a.y), (b.x + 1.0, b.y), BOX_COLOR);
    }
}

/// Draw the detection's bounding box when there is one; returns whether it drew
pub fn annotate(img: &mut RgbImage, detection: &Detection) -> bool {
    match detection.bounding_box() {
        Some(rect) => {
            draw_bounding_box(img, &rect);
            true
        }
        None => false,
    }
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary matrix.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of dark pixels.
    pub dark_pixels: usize,
    /// Total pixels in the matrix.
    pub total_pixels: usize,
    /// Ratio of dark pixels to total pixels.
    pub dark_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats { min: 0, max: 0, avg: 0 };
    }
    let min = gray.iter().copied().min().unwrap_or(0);
    let max = gray.iter().copied().max().unwrap_or(0);
    let sum: u64 = gray.iter().map(|&v| v as u64).sum();
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Compute dark-pixel stats for a binary matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    let dark = binary.count_set();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 {
        0.0
    } else {
        dark as f64 / total as f64
    };
    BinaryStats {
        dark_pixels: dark,
        total_pixels: total,
        dark_ratio: ratio,
    }
}

/// Grayscale + Otsu binarization of an RGB image, as the locator sees it
pub fn grayscale_and_binary(img: &RgbImage) -> (Vec<u8>, BitMatrix) {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let gray = rgb_to_grayscale(img.as_raw(), w, h);
    let binary = otsu_binarize(&gray, w, h);
    (gray, binary)
}

/// Sorted image paths under `root` (recursive), optionally truncated.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp") {
                    images.push(path);
                }
            }
        }
    }

    images
}

/// Per-image evaluation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRecord {
    /// Source image
    pub path: PathBuf,
    /// File stem used as the CSV column name
    pub name: String,
    /// Whether a QR code was located
    pub detected: bool,
    /// Position boxes accepted (diagnostic)
    pub accepted: usize,
}

/// Locate a QR code in every image, in parallel.
///
/// Unreadable images are logged and skipped. When `out_dir` is set, every
/// image is written there with its bounding box drawn (if any). Records come
/// back sorted by name.
pub fn evaluate_dataset(
    locator: &Locator,
    images: &[PathBuf],
    out_dir: Option<&Path>,
) -> Result<Vec<EvalRecord>, LocateError> {
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    let results: Vec<Result<Option<EvalRecord>, LocateError>> = images
        .par_iter()
        .map(|path| {
            let mut img = match load_rgb(path) {
                Ok(img) => img,
                Err(err) => {
                    log::warn!("{}", err);
                    return Ok(None);
                }
            };
            let detection = locate_image(locator, &img);
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            if let (Some(dir), Some(file_name)) = (out_dir, path.file_name()) {
                annotate(&mut img, &detection);
                save_rgb(&img, dir.join(file_name))?;
            }

            Ok(Some(EvalRecord {
                path: path.clone(),
                name,
                detected: !detection.is_empty(),
                accepted: detection.accepted,
            }))
        })
        .collect();

    let mut records = Vec::with_capacity(results.len());
    for result in results {
        if let Some(record) = result? {
            records.push(record);
        }
    }
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
}

/// Write records as a two-row CSV: a header of image names and one result row.
///
/// ```text
/// algorithm,img_a,img_b,
/// self,1,0,
/// ```
pub fn write_eval_csv<W: Write>(
    out: &mut W,
    algorithm: &str,
    records: &[EvalRecord],
) -> Result<(), LocateError> {
    write!(out, "algorithm,")?;
    for record in records {
        write!(out, "{},", record.name)?;
    }
    writeln!(out)?;
    write!(out, "{},", algorithm)?;
    for record in records {
        write!(out, "{},", u8::from(record.detected))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Fraction of records with a located QR code, in percent
pub fn detection_rate(records: &[EvalRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let hits = records.iter().filter(|r| r.detected).count();
    hits as f64 * 100.0 / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("qr_locator_tools_{nanos}_{sequence}"));
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    fn record(name: &str, detected: bool) -> EvalRecord {
        EvalRecord {
            path: PathBuf::from(format!("{name}.png")),
            name: name.to_string(),
            detected,
            accepted: if detected { 3 } else { 1 },
        }
    }

    #[test]
    fn csv_has_header_and_result_rows() {
        let records = vec![record("alpha", true), record("beta", false)];
        let mut out = Vec::new();
        write_eval_csv(&mut out, "self", &records).expect("csv");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "algorithm,alpha,beta,\nself,1,0,\n");
        assert!((detection_rate(&records) - 50.0).abs() < 1e-9);
        assert_eq!(detection_rate(&[]), 0.0);
    }

    #[test]
    fn dataset_iter_filters_and_sorts() {
        let dir = temp_dir();
        fs::write(dir.join("b.png"), b"").expect("write");
        fs::write(dir.join("a.JPG"), b"").expect("write");
        fs::write(dir.join("notes.txt"), b"").expect("write");
        fs::create_dir_all(dir.join("nested")).expect("nested");
        fs::write(dir.join("nested").join("c.bmp"), b"").expect("write");

        let all: Vec<PathBuf> = dataset_iter(&dir, None).collect();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dataset_iter(&dir, Some(1)).count(), 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn evaluation_skips_unreadable_images() {
        let dir = temp_dir();
        let bogus = dir.join("broken.png");
        fs::write(&bogus, b"not an image").expect("write");
        let blank = dir.join("blank.png");
        save_rgb(&RgbImage::from_pixel(40, 40, Rgb([255, 255, 255])), &blank).expect("save");

        let records = evaluate_dataset(&Locator::new(), &[bogus, blank], None).expect("eval");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "blank");
        assert!(!records[0].detected);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn bounding_box_is_drawn_green() {
        let mut img = RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]));
        let rect = RotatedRect::new(Point::new(25.0, 25.0), 20.0, 20.0, 0.0);
        draw_bounding_box(&mut img, &rect);
        assert_eq!(*img.get_pixel(15, 25), BOX_COLOR);
        assert_eq!(*img.get_pixel(25, 25), Rgb([0, 0, 0]));
        assert!(!annotate(&mut img, &Detection::failed(0)));
    }
}
