use std::path::PathBuf;

/// Errors surfaced by the input-checked entry points and the tooling.
///
/// The locator itself never fails: a missing QR code is an empty
/// [`Detection`](crate::Detection), not an error.
#[derive(thiserror::Error, Debug)]
pub enum LocateError {
    /// Width or height is zero
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// RGB buffer length does not match `width * height * 3`
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required by the dimensions
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Image could not be opened or decoded
    #[error("failed to read image {path}")]
    Load {
        /// Offending file
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },
    /// Image could not be encoded or written
    #[error("failed to write image {path}")]
    Save {
        /// Destination file
        path: PathBuf,
        /// Encoder error
        #[source]
        source: image::ImageError,
    },
    /// Filesystem error from the tooling (directories, CSV output)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = LocateError::BufferSize {
            expected: 12,
            actual: 10,
        };
        assert_eq!(err.to_string(), "pixel buffer holds 10 bytes, expected 12");
        let err = LocateError::EmptyImage {
            width: 0,
            height: 4,
        };
        assert_eq!(err.to_string(), "image has no pixels (0x4)");
    }

    #[test]
    fn load_error_keeps_its_source() {
        use std::error::Error;
        let err = crate::tools::load_rgb("/nonexistent/qr_locator/missing.png")
            .expect_err("missing file");
        assert!(matches!(err, LocateError::Load { .. }));
        assert!(err.source().is_some());
    }
}
