use std::path::PathBuf;

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::drivers::{CompareError, CompareOptions, ImageComparator, PageDriver, PageError};
use crate::report::CheckError;
use crate::runner::LayoutPaths;

/// Mismatch percentage above which the layout counts as different.
/// Strictly greater than; exactly this value still passes.
const MISMATCH_THRESHOLD: f64 = 10.0;

/// Compares a full-page screenshot against the reference layout.
///
/// The only check with side effects: it writes the screenshot and the diff
/// image to the per-run paths.
pub async fn check_layout<D: PageDriver, C: ImageComparator>(
    driver: &D,
    page: &D::Page,
    comparator: &C,
    paths: &LayoutPaths,
    options: &CompareOptions,
) -> Result<Vec<CheckError>, LayoutCheckError> {
    driver
        .screenshot(page, &paths.screenshot)
        .await
        .context(ScreenshotSnafu)?;

    let reference = fs::read(&paths.reference).await.context(ReadSnafu {
        path: paths.reference.clone(),
    })?;
    let actual = fs::read(&paths.screenshot).await.context(ReadSnafu {
        path: paths.screenshot.clone(),
    })?;

    let comparison = comparator
        .compare(&reference, &actual, options)
        .context(CompareFailedSnafu)?;
    fs::write(&paths.diff, comparison.diff_image)
        .await
        .0
        .context(WriteDiffSnafu {
            path: paths.diff.clone(),
        })?;
    debug!(
        "Layout mismatch: {:.2}% (threshold {}%)",
        comparison.mismatch_percentage, MISMATCH_THRESHOLD
    );

    if comparison.mismatch_percentage > MISMATCH_THRESHOLD {
        Ok(vec![CheckError::LayoutDifferent {
            difference: comparison.mismatch_percentage,
        }])
    } else {
        Ok(Vec::new())
    }
}

#[derive(Debug, Snafu)]
pub enum LayoutCheckError {
    #[snafu(display("Failed to capture the page screenshot"))]
    ScreenshotError { source: PageError },
    #[snafu(display("Failed to read image {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to compare the screenshot against the reference"))]
    CompareFailed { source: CompareError },
    #[snafu(display("Failed to write the diff image to {}", path.display()))]
    WriteDiffError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Comparison;
    use serde_json::Value;
    use std::path::Path;
    use tempfile::TempDir;

    /// Driver whose screenshot is a fixed byte blob.
    struct BlobDriver(Vec<u8>);

    impl PageDriver for BlobDriver {
        type Page = ();

        async fn open(&self, _path: &Path) -> Result<(), PageError> {
            Ok(())
        }

        async fn exists(&self, _page: &(), _selector: &str) -> Result<bool, PageError> {
            Ok(true)
        }

        async fn computed_style(
            &self,
            _page: &(),
            _selector: &str,
            _properties: &[&str],
        ) -> Result<Vec<String>, PageError> {
            Ok(Vec::new())
        }

        async fn screenshot(&self, _page: &(), out_path: &Path) -> Result<(), PageError> {
            std::fs::write(out_path, &self.0).map_err(|source| {
                PageError::WriteScreenshotError {
                    path: out_path.to_path_buf(),
                    source,
                }
            })
        }

        async fn evaluate(&self, _page: &(), _expr: &str) -> Result<Value, PageError> {
            Ok(Value::Null)
        }

        async fn close(&self, _page: ()) -> Result<(), PageError> {
            Ok(())
        }
    }

    /// Comparator with a predetermined mismatch percentage.
    struct FixedComparator(f64);

    impl ImageComparator for FixedComparator {
        fn compare(
            &self,
            _reference: &[u8],
            _actual: &[u8],
            _options: &CompareOptions,
        ) -> Result<Comparison, CompareError> {
            Ok(Comparison {
                mismatch_percentage: self.0,
                diff_image: vec![1, 2, 3],
            })
        }
    }

    fn paths_in(dir: &Path) -> LayoutPaths {
        std::fs::write(dir.join("reference.png"), [0u8]).expect("Failed to write reference");
        LayoutPaths {
            reference: dir.join("reference.png"),
            screenshot: dir.join("screenshot.png"),
            diff: dir.join("diff.png"),
        }
    }

    #[compio::test]
    async fn mismatch_above_threshold_is_flagged() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let paths = paths_in(dir.path());
        let errors = check_layout(
            &BlobDriver(vec![7u8]),
            &(),
            &FixedComparator(10.01),
            &paths,
            &CompareOptions::default(),
        )
        .await
        .expect("Check failed");

        assert_eq!(errors, [CheckError::LayoutDifferent { difference: 10.01 }]);
    }

    #[compio::test]
    async fn mismatch_exactly_at_threshold_passes() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let paths = paths_in(dir.path());
        let errors = check_layout(
            &BlobDriver(vec![7u8]),
            &(),
            &FixedComparator(10.0),
            &paths,
            &CompareOptions::default(),
        )
        .await
        .expect("Check failed");

        assert_eq!(errors, []);
    }

    #[compio::test]
    async fn diff_image_lands_on_the_configured_path() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let paths = paths_in(dir.path());
        check_layout(
            &BlobDriver(vec![7u8]),
            &(),
            &FixedComparator(0.0),
            &paths,
            &CompareOptions::default(),
        )
        .await
        .expect("Check failed");

        assert_eq!(std::fs::read(&paths.diff).expect("diff missing"), [1, 2, 3]);
    }

    #[compio::test]
    async fn missing_reference_is_an_infrastructure_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let paths = LayoutPaths {
            reference: dir.path().join("absent.png"),
            screenshot: dir.path().join("screenshot.png"),
            diff: dir.path().join("diff.png"),
        };
        let result = check_layout(
            &BlobDriver(vec![7u8]),
            &(),
            &FixedComparator(0.0),
            &paths,
            &CompareOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(LayoutCheckError::ReadError { .. })));
    }
}
