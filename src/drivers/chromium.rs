use std::path::Path;
use std::sync::Arc;

use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use serde_json::Value;
use snafu::ResultExt;
use tracing::debug;

use crate::drivers::js_string;
use crate::drivers::page::{PageDriver, PageError, WriteScreenshotSnafu};
use crate::ext::BestEffortPathExt;

/// Page driver over a headless Chromium instance (CDP).
///
/// The underlying client is synchronous, so every call blocks the event loop
/// for the duration of one protocol round-trip.
pub struct ChromiumDriver {
    window_size: (u32, u32),
}

impl ChromiumDriver {
    pub fn new() -> Self {
        Self {
            window_size: (1280, 1024),
        }
    }
}

impl Default for ChromiumDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// The browser lives exactly as long as the page handle; dropping the handle
/// tears the browser process down.
pub struct ChromiumPage {
    _browser: Browser,
    tab: Arc<Tab>,
}

/// Evaluates `expr` in the page, round-tripping the result through
/// `JSON.stringify` so arrays and objects come back by value.
fn eval_json(tab: &Tab, expr: &str) -> Result<Value, PageError> {
    let wrapped = format!("JSON.stringify(({expr}) ?? null)");
    let object = tab
        .evaluate(&wrapped, false)
        .map_err(|e| PageError::EvaluateError {
            message: e.to_string(),
        })?;

    match object.value {
        Some(Value::String(text)) => {
            serde_json::from_str(&text).map_err(|e| PageError::UnexpectedValue {
                detail: e.to_string(),
            })
        }
        Some(other) => Ok(other),
        None => Ok(Value::Null),
    }
}

impl PageDriver for ChromiumDriver {
    type Page = ChromiumPage;

    async fn open(&self, path: &Path) -> Result<ChromiumPage, PageError> {
        let url = format!("file://{}", path.best_effort_path_display());
        debug!("Opening page {}", url);

        let options = LaunchOptionsBuilder::default()
            .headless(true)
            .window_size(Some(self.window_size))
            .build()
            .map_err(|e| PageError::LaunchError {
                message: e.to_string(),
            })?;
        let browser = Browser::new(options).map_err(|e| PageError::LaunchError {
            message: e.to_string(),
        })?;

        let tab = browser.new_tab().map_err(|e| PageError::OpenError {
            url: url.clone(),
            message: e.to_string(),
        })?;
        tab.navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| PageError::OpenError {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(ChromiumPage {
            _browser: browser,
            tab,
        })
    }

    async fn exists(&self, page: &ChromiumPage, selector: &str) -> Result<bool, PageError> {
        let expr = format!("document.querySelector({}) !== null", js_string(selector));
        Ok(eval_json(&page.tab, &expr)? == Value::Bool(true))
    }

    async fn computed_style(
        &self,
        page: &ChromiumPage,
        selector: &str,
        properties: &[&str],
    ) -> Result<Vec<String>, PageError> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({sel}); if (!el) return null; \
             const cs = window.getComputedStyle(el); \
             return {props}.map((p) => cs.getPropertyValue(p)); }})()",
            sel = js_string(selector),
            props = serde_json::to_string(properties).unwrap_or_default(),
        );

        match eval_json(&page.tab, &expr)? {
            Value::Null => Err(PageError::SelectorNotFound {
                selector: selector.to_string(),
            }),
            Value::Array(items) => Ok(items
                .into_iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect()),
            other => Err(PageError::UnexpectedValue {
                detail: format!("expected an array of styles, got {other}"),
            }),
        }
    }

    async fn screenshot(&self, page: &ChromiumPage, out_path: &Path) -> Result<(), PageError> {
        // The capture clip is the full document, not just the viewport.
        let size = eval_json(
            &page.tab,
            "[document.documentElement.scrollWidth, document.documentElement.scrollHeight]",
        )?;
        let (width, height) = match (size.get(0), size.get(1)) {
            (Some(w), Some(h)) => (
                w.as_f64().unwrap_or(self.window_size.0 as f64),
                h.as_f64().unwrap_or(self.window_size.1 as f64),
            ),
            _ => (self.window_size.0 as f64, self.window_size.1 as f64),
        };
        let clip = Viewport {
            x: 0.0,
            y: 0.0,
            width,
            height,
            scale: 1.0,
        };

        let png = page
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| PageError::ScreenshotError {
                message: e.to_string(),
            })?;

        compio::fs::write(out_path, png)
            .await
            .0
            .context(WriteScreenshotSnafu {
                path: out_path.to_path_buf(),
            })
    }

    async fn evaluate(&self, page: &ChromiumPage, expr: &str) -> Result<Value, PageError> {
        eval_json(&page.tab, expr)
    }

    async fn close(&self, page: ChromiumPage) -> Result<(), PageError> {
        debug!("Closing the page handle");
        page.tab.close(false).map_err(|e| PageError::CloseError {
            message: e.to_string(),
        })?;
        Ok(())
    }
}
