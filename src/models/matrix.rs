use crate::models::PointI;

/// Packed binary image, row-major.
///
/// A set bit means a dark pixel (0 after thresholding), a clear bit a light
/// one (255). The same type doubles as the accumulator mask the locator draws
/// accepted position boxes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-clear matrix
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range reads are clear
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y); out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Set a bit addressed with signed coordinates, ignoring anything outside
    pub fn set_signed(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        self.set(x as usize, y as usize, true);
    }

    /// Number of set bits
    pub fn count_set(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Coordinates of every set bit, scanned row by row
    pub fn set_points(&self) -> Vec<PointI> {
        let mut points = Vec::with_capacity(self.count_set());
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    points.push(PointI::new(x as i32, y as i32));
                }
            }
        }
        points
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
