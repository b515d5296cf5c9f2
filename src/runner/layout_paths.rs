use std::path::{Path, PathBuf};

/// Filesystem locations the layout check reads and writes.
///
/// Built per invocation so independent runs never collide on artifact paths;
/// the screenshot and diff usually live in a per-run temporary directory.
#[derive(Debug, Clone)]
pub struct LayoutPaths {
    /// Pre-supplied reference layout image.
    pub reference: PathBuf,
    /// Where the full-page screenshot is captured to.
    pub screenshot: PathBuf,
    /// Where the highlighted diff image is written.
    pub diff: PathBuf,
}

impl LayoutPaths {
    /// Places screenshot and diff under `work_dir`.
    pub fn in_dir(work_dir: &Path, reference: PathBuf) -> Self {
        Self {
            reference,
            screenshot: work_dir.join("screenshot.png"),
            diff: work_dir.join("diff.png"),
        }
    }
}
