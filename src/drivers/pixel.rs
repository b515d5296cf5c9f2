use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use snafu::ResultExt;

use crate::drivers::compare::{
    CompareError, CompareOptions, Comparison, DecodeSnafu, EncodeSnafu, ImageComparator,
};

/// Per-channel slack accepted when anti-aliasing is ignored.
const ANTIALIAS_TOLERANCE: u8 = 32;

/// Pixel-level image comparator.
///
/// Counts mismatching pixels over the reference dimensions and renders a
/// diff image: unchanged pixels faded, mismatches in the error color.
pub struct PixelComparator;

fn channels_match(a: Rgba<u8>, b: Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

/// Whether `pixel` appears within one pixel of (x, y) in `other`.
fn found_nearby(pixel: Rgba<u8>, other: &RgbaImage, x: u32, y: u32, tolerance: u8) -> bool {
    let (width, height) = other.dimensions();
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            if channels_match(pixel, *other.get_pixel(nx as u32, ny as u32), tolerance) {
                return true;
            }
        }
    }
    false
}

impl ImageComparator for PixelComparator {
    fn compare(
        &self,
        reference: &[u8],
        actual: &[u8],
        options: &CompareOptions,
    ) -> Result<Comparison, CompareError> {
        let reference = image::load_from_memory(reference)
            .context(DecodeSnafu { which: "reference" })?
            .to_rgba8();
        let mut actual = image::load_from_memory(actual)
            .context(DecodeSnafu { which: "actual" })?
            .to_rgba8();

        let (width, height) = reference.dimensions();
        if options.scale_to_same_size && actual.dimensions() != (width, height) {
            actual = imageops::resize(&actual, width, height, imageops::FilterType::Triangle);
        }

        let tolerance = if options.ignore_antialiasing {
            ANTIALIAS_TOLERANCE
        } else {
            0
        };
        let faded_alpha = (options.unchanged_transparency.clamp(0.0, 1.0) * 255.0) as u8;

        let mut diff = RgbaImage::new(width, height);
        let mut mismatched = 0u64;
        for y in 0..height {
            for x in 0..width {
                let expected = *reference.get_pixel(x, y);
                let in_actual = x < actual.width() && y < actual.height();
                let mut matches = in_actual
                    && channels_match(expected, *actual.get_pixel(x, y), tolerance);
                if !matches && options.detect_movement && in_actual {
                    matches = found_nearby(expected, &actual, x, y, tolerance);
                }

                if matches {
                    let Rgba([r, g, b, _]) = expected;
                    diff.put_pixel(x, y, Rgba([r, g, b, faded_alpha]));
                } else {
                    mismatched += 1;
                    let [r, g, b] = options.error_color;
                    diff.put_pixel(x, y, Rgba([r, g, b, 255]));
                }
            }
        }

        let total = u64::from(width) * u64::from(height);
        let mismatch_percentage = if total == 0 {
            0.0
        } else {
            mismatched as f64 / total as f64 * 100.0
        };

        let mut encoded = Vec::new();
        DynamicImage::ImageRgba8(diff)
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .context(EncodeSnafu)?;

        Ok(Comparison {
            mismatch_percentage,
            diff_image: encoded,
        })
    }
}
