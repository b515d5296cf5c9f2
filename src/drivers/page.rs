use std::path::{Path, PathBuf};

use serde_json::Value;
use snafu::Snafu;

/// Rendered-page automation interface.
///
/// One handle is opened per run and shared read-only across the fanned-out
/// checks; none of the operations mutate the page. `close` must be called by
/// whoever opened the handle, also when a check fails.
pub trait PageDriver {
    type Page;

    /// Opens the page for a local html file and waits for it to settle.
    async fn open(&self, path: &Path) -> Result<Self::Page, PageError>;

    /// Whether any element matches the CSS selector.
    async fn exists(&self, page: &Self::Page, selector: &str) -> Result<bool, PageError>;

    /// Computed style values for the first element matching the selector,
    /// one string per requested property, in request order.
    async fn computed_style(
        &self,
        page: &Self::Page,
        selector: &str,
        properties: &[&str],
    ) -> Result<Vec<String>, PageError>;

    /// Captures a full-page PNG screenshot to `out_path`.
    async fn screenshot(&self, page: &Self::Page, out_path: &Path) -> Result<(), PageError>;

    /// Evaluates a read-only expression in the page and returns its
    /// JSON-serializable result.
    async fn evaluate(&self, page: &Self::Page, expr: &str) -> Result<Value, PageError>;

    /// Releases the page handle.
    async fn close(&self, page: Self::Page) -> Result<(), PageError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PageError {
    #[snafu(display("Failed to launch the browser: {message}"))]
    LaunchError { message: String },
    #[snafu(display("Failed to open page {url}: {message}"))]
    OpenError { url: String, message: String },
    #[snafu(display("Failed to evaluate an expression on the page: {message}"))]
    EvaluateError { message: String },
    #[snafu(display("No element matches selector '{selector}'"))]
    SelectorNotFound { selector: String },
    #[snafu(display("Failed to capture a screenshot: {message}"))]
    ScreenshotError { message: String },
    #[snafu(display("Failed to write the screenshot to {}", path.display()))]
    WriteScreenshotError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to close the page: {message}"))]
    CloseError { message: String },
    #[snafu(display("Unexpected result shape from the page: {detail}"))]
    UnexpectedValue { detail: String },
}
