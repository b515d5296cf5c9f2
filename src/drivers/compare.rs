use snafu::Snafu;

/// Image similarity comparator interface.
///
/// Pure computation over two encoded images; writing the diff image to disk
/// is the caller's business.
pub trait ImageComparator {
    fn compare(
        &self,
        reference: &[u8],
        actual: &[u8],
        options: &CompareOptions,
    ) -> Result<Comparison, CompareError>;
}

/// Every recognized comparison option, with documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// RGB used to highlight mismatching pixels in the diff image.
    /// Default: pure red.
    pub error_color: [u8; 3],
    /// When set, a pixel also counts as matching if its color appears within
    /// a one-pixel neighborhood in the other image, tolerating small element
    /// movement. Default: off.
    pub detect_movement: bool,
    /// Alpha applied to unchanged pixels in the diff image so highlights
    /// stand out. Default: 0.3.
    pub unchanged_transparency: f32,
    /// Scale the actual image to the reference dimensions before comparing.
    /// When off, differing dimensions count the non-overlapping area as
    /// mismatched. Default: on.
    pub scale_to_same_size: bool,
    /// Tolerate small per-channel deviations produced by anti-aliasing
    /// instead of requiring exact channel equality. Default: on.
    pub ignore_antialiasing: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            error_color: [255, 0, 0],
            detect_movement: false,
            unchanged_transparency: 0.3,
            scale_to_same_size: true,
            ignore_antialiasing: true,
        }
    }
}

/// Comparison outcome: how different the images are, plus an encoded diff
/// image with mismatches highlighted.
pub struct Comparison {
    pub mismatch_percentage: f64,
    pub diff_image: Vec<u8>,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompareError {
    #[snafu(display("Failed to decode the {which} image"))]
    DecodeError {
        which: &'static str,
        source: image::ImageError,
    },
    #[snafu(display("Failed to encode the diff image"))]
    EncodeError { source: image::ImageError },
}
