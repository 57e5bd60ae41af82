use crate::models::BitMatrix;

/// Convert grayscale image to binary using Otsu's thresholding method.
///
/// A pixel is light when its value is strictly above the Otsu level and
/// dark otherwise. Returns a BitMatrix where true = dark, false = light.
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let level = otsu_level(&gray[..width * height]);
    threshold_binarize(gray, width, height, level)
}

/// Otsu's optimal level: the last intensity of the dark class.
///
/// The level maximizes the between-class variance of the histogram split
/// into `[0, level]` and `(level, 255]`. Ties keep the lowest level. An
/// empty or single-valued image yields 0.
pub fn otsu_level(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    if total == 0.0 {
        return 0;
    }
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut dark_count = 0.0f64;
    let mut dark_sum = 0.0f64;
    let mut max_variance = 0.0f64;
    let mut level = 0u8;

    for t in 0..255usize {
        dark_count += histogram[t] as f64;
        dark_sum += t as f64 * histogram[t] as f64;
        let light_count = total - dark_count;
        if dark_count == 0.0 || light_count == 0.0 {
            continue;
        }

        let dark_mean = dark_sum / dark_count;
        let light_mean = (total_sum - dark_sum) / light_count;
        let variance = (dark_count / total) * (light_count / total) * (dark_mean - light_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            level = t as u8;
        }
    }

    level
}

/// Global threshold: dark where `value <= level`
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, level: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);

    for y in 0..height {
        let row = &gray[y * width..(y + 1) * width];
        for (x, &value) in row.iter().enumerate() {
            if value <= level {
                binary.set(x, y, true);
            }
        }
    }

    binary
}
