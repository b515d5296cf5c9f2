use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::checks::{
    LayoutCheckError, check_contacts, check_fonts, check_lang, check_layout, check_load_order,
    check_logo, check_markup, check_reset_margins, check_semantic_tags, check_structure,
    check_stylesheets, check_title,
};
use crate::config::CheckConfig;
use crate::drivers::{
    CompareOptions, ImageComparator, LintError, MarkupError, MarkupValidator, PageDriver,
    PageError, StyleLinter,
};
use crate::report::CheckError;
use crate::runner::LayoutPaths;
use crate::structure::ScanError;

/// The external collaborators one run needs, bundled so `run_tests` stays
/// one generic signature.
pub struct Collaborators<P, M, L, C> {
    pub page: P,
    pub markup: M,
    pub linter: L,
    pub comparator: C,
}

/// Runs the full check suite against one submission.
///
/// The structural check is the gate: when it fails, its errors are the whole
/// result and nothing else runs, no page is opened, no collaborator is
/// contacted. Otherwise every remaining check is launched concurrently
/// against one shared read-only page handle and the results are flattened in
/// launch order. The first collaborator failure rejects the whole run with
/// no partial results; the page handle is released either way.
pub async fn run_tests<P, M, L, C>(
    project: &Path,
    lang: &str,
    config: &CheckConfig,
    layout: &LayoutPaths,
    collab: &Collaborators<P, M, L, C>,
) -> Result<Vec<CheckError>, RunError>
where
    P: PageDriver,
    M: MarkupValidator,
    L: StyleLinter,
    C: ImageComparator,
{
    let structural = check_structure(&config.structure, project).context(ScanFailedSnafu)?;
    if !structural.is_empty() {
        info!(
            "Structural gate failed with {} errors; skipping all other checks",
            structural.len()
        );
        return Ok(structural);
    }

    let index_path = project.join(&config.index_html);
    let html = read_text(&index_path).await?;
    let fonts_css = read_text(&project.join(&config.fonts_css)).await?;
    let main_css = read_text(&project.join(&config.main_css)).await?;
    let css = format!("{fonts_css}\n{main_css}");
    let css_glob = project.join(&config.css_glob).to_string_lossy().into_owned();

    let page = collab.page.open(&index_path).await.context(PageFailedSnafu)?;
    debug!("Page open, launching the check fan-out");

    let compare_options = CompareOptions::default();
    let outcome = futures::try_join!(
        async { check_markup(&collab.markup, &html).await.context(MarkupFailedSnafu) },
        async {
            check_stylesheets(&collab.linter, &config.stylelint_config, &css_glob)
                .await
                .context(LintFailedSnafu)
        },
        async {
            check_load_order(
                &collab.page,
                &page,
                file_name(&config.fonts_css),
                file_name(&config.main_css),
            )
            .await
            .context(PageFailedSnafu)
        },
        async { Ok::<_, RunError>(check_fonts(&css, &config.font_whitelist)) },
        async {
            check_semantic_tags(&collab.page, &page, &config.semantic_tags)
                .await
                .context(PageFailedSnafu)
        },
        async { check_lang(&collab.page, &page, lang).await.context(PageFailedSnafu) },
        async { check_title(&collab.page, &page).await.context(PageFailedSnafu) },
        async {
            check_reset_margins(&collab.page, &page, &config.reset_tags)
                .await
                .context(PageFailedSnafu)
        },
        async {
            check_logo(&collab.page, &page, &config.logo_selector)
                .await
                .context(PageFailedSnafu)
        },
        async { check_contacts(&collab.page, &page).await.context(PageFailedSnafu) },
        async {
            check_layout(&collab.page, &page, &collab.comparator, layout, &compare_options)
                .await
                .context(LayoutFailedSnafu)
        },
    );

    // The handle is released no matter how the fan-out went. A close failure
    // after a check failure is logged rather than allowed to mask it.
    if let Err(close_error) = collab.page.close(page).await {
        if outcome.is_ok() {
            return Err(close_error).context(PageFailedSnafu);
        }
        warn!("Failed to close the page after a check failure: {close_error}");
    }

    let (markup, stylesheets, order, fonts, tags, lang_attr, title, margins, logo, contacts, layout) =
        outcome?;

    let mut errors = Vec::new();
    for part in [
        markup,
        stylesheets,
        order,
        fonts,
        tags,
        lang_attr,
        title,
        margins,
        logo,
        contacts,
        layout,
    ] {
        errors.extend(part);
    }
    info!("Run finished with {} errors", errors.len());
    Ok(errors)
}

async fn read_text(path: &Path) -> Result<String, RunError> {
    let bytes = fs::read(path).await.context(ReadFileSnafu {
        path: path.to_path_buf(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Debug, Snafu)]
pub enum RunError {
    #[snafu(display("Failed to scan the submission tree"))]
    ScanFailed { source: ScanError },
    #[snafu(display("Failed to read {}", path.display()))]
    ReadFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Page automation failed"))]
    PageFailed { source: PageError },
    #[snafu(display("Markup validation failed"))]
    MarkupFailed { source: MarkupError },
    #[snafu(display("Stylesheet linting failed"))]
    LintFailed { source: LintError },
    #[snafu(display("Layout comparison failed"))]
    LayoutFailed { source: LayoutCheckError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{CompareError, Comparison, LintFileReport, LintWarning, MarkupMessage};
    use crate::structure::CanonicalNode;
    use serde_json::Value;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::fs::{File, create_dir};
    use std::io::Write;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockDriver {
        opens: Cell<usize>,
        closes: Cell<usize>,
        existing: Vec<String>,
        title: String,
        load_order_ok: bool,
        styles: HashMap<String, Vec<String>>,
        fail_evaluate: bool,
        fail_close: bool,
    }

    impl PageDriver for MockDriver {
        type Page = ();

        async fn open(&self, _path: &Path) -> Result<(), PageError> {
            self.opens.set(self.opens.get() + 1);
            Ok(())
        }

        async fn exists(&self, _page: &(), selector: &str) -> Result<bool, PageError> {
            Ok(self.existing.iter().any(|s| s == selector))
        }

        async fn computed_style(
            &self,
            _page: &(),
            selector: &str,
            _properties: &[&str],
        ) -> Result<Vec<String>, PageError> {
            Ok(self
                .styles
                .get(selector)
                .cloned()
                .unwrap_or_else(|| vec!["0px".to_string(), "0px".to_string()]))
        }

        async fn screenshot(&self, _page: &(), out_path: &Path) -> Result<(), PageError> {
            std::fs::write(out_path, [0u8]).map_err(|source| PageError::WriteScreenshotError {
                path: out_path.to_path_buf(),
                source,
            })
        }

        async fn evaluate(&self, _page: &(), expr: &str) -> Result<Value, PageError> {
            if self.fail_evaluate {
                return Err(PageError::EvaluateError {
                    message: "mock failure".into(),
                });
            }
            if expr == "document.title" {
                return Ok(Value::String(self.title.clone()));
            }
            if expr.contains("findIndex") {
                return Ok(Value::Bool(self.load_order_ok));
            }
            Ok(Value::Null)
        }

        async fn close(&self, _page: ()) -> Result<(), PageError> {
            self.closes.set(self.closes.get() + 1);
            if self.fail_close {
                return Err(PageError::CloseError {
                    message: "close failed".into(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockValidator {
        calls: Cell<usize>,
        messages: Vec<MarkupMessage>,
    }

    impl MarkupValidator for MockValidator {
        async fn validate(&self, _html: &str) -> Result<Vec<MarkupMessage>, MarkupError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.messages.clone())
        }
    }

    #[derive(Default)]
    struct MockLinter {
        calls: Cell<usize>,
        reports: Vec<LintFileReport>,
    }

    impl StyleLinter for MockLinter {
        async fn lint(
            &self,
            _config: &Path,
            _file_glob: &str,
        ) -> Result<Vec<LintFileReport>, LintError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reports.clone())
        }
    }

    struct MockComparator(f64);

    impl ImageComparator for MockComparator {
        fn compare(
            &self,
            _reference: &[u8],
            _actual: &[u8],
            _options: &CompareOptions,
        ) -> Result<Comparison, CompareError> {
            Ok(Comparison {
                mismatch_percentage: self.0,
                diff_image: vec![0],
            })
        }
    }

    fn test_config() -> CheckConfig {
        CheckConfig {
            structure: vec![
                CanonicalNode::file("index.html"),
                CanonicalNode::directory("styles", vec![CanonicalNode::file("style.css")]),
                CanonicalNode::directory("fonts", vec![CanonicalNode::file("fonts.css")]),
            ],
            index_html: "index.html".into(),
            semantic_tags: vec!["header".into(), "main".into(), "footer".into()],
            font_whitelist: vec!["Arial".into()],
            reset_tags: vec!["body".into()],
            logo_selector: "header a .logo".into(),
            fonts_css: "fonts/fonts.css".into(),
            main_css: "styles/style.css".into(),
            stylelint_config: ".stylelintrc.json".into(),
            css_glob: "styles/**/*.css".into(),
        }
    }

    /// Selectors a fully conforming page answers to.
    fn conforming_selectors() -> Vec<String> {
        [
            "header",
            "main",
            "footer",
            "html[lang*=en]",
            "header a .logo",
            "a[href^=\"mailto:\"]",
            "a[href^=\"tel:\"]",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn write_project(dir: &TempDir, style_css: &str) {
        let root = dir.path();
        let mut index = File::create(root.join("index.html")).expect("create index");
        writeln!(index, "<!DOCTYPE html><html lang=\"en\"></html>").expect("write index");
        create_dir(root.join("styles")).expect("create styles");
        std::fs::write(root.join("styles/style.css"), style_css).expect("write style");
        create_dir(root.join("fonts")).expect("create fonts");
        std::fs::write(root.join("fonts/fonts.css"), "").expect("write fonts css");
    }

    fn layout_paths(dir: &TempDir) -> LayoutPaths {
        std::fs::write(dir.path().join("reference.png"), [0u8]).expect("write reference");
        LayoutPaths::in_dir(dir.path(), dir.path().join("reference.png"))
    }

    fn passing_collaborators() -> Collaborators<MockDriver, MockValidator, MockLinter, MockComparator>
    {
        Collaborators {
            page: MockDriver {
                existing: conforming_selectors(),
                title: "Museum".into(),
                load_order_ok: true,
                ..MockDriver::default()
            },
            markup: MockValidator::default(),
            linter: MockLinter::default(),
            comparator: MockComparator(0.0),
        }
    }

    #[compio::test]
    async fn conforming_submission_produces_no_errors() {
        let dir = TempDir::new().expect("temp dir");
        write_project(&dir, "body { margin: 0; font-family: Arial; }");
        let collab = passing_collaborators();

        let errors = run_tests(dir.path(), "en", &test_config(), &layout_paths(&dir), &collab)
            .await
            .expect("Run failed");

        assert_eq!(errors, []);
        assert_eq!(collab.page.opens.get(), 1);
        assert_eq!(collab.page.closes.get(), 1);
    }

    #[compio::test]
    async fn structural_failure_gates_every_other_check() {
        let dir = TempDir::new().expect("temp dir");
        // Only index.html: both directories are missing.
        File::create(dir.path().join("index.html")).expect("create index");
        let collab = passing_collaborators();

        let errors = run_tests(dir.path(), "en", &test_config(), &layout_paths(&dir), &collab)
            .await
            .expect("Run failed");

        assert_eq!(
            errors.iter().map(CheckError::id).collect::<Vec<_>>(),
            ["structure.directory", "structure.directory"]
        );
        assert_eq!(collab.page.opens.get(), 0);
        assert_eq!(collab.markup.calls.get(), 0);
        assert_eq!(collab.linter.calls.get(), 0);
    }

    #[compio::test]
    async fn results_flatten_in_launch_order() {
        let dir = TempDir::new().expect("temp dir");
        // Papyrus is off the whitelist; everything DOM-side fails too.
        write_project(&dir, "body { font-family: Papyrus; }");
        let collab = Collaborators {
            page: MockDriver {
                title: "Document".into(),
                load_order_ok: false,
                styles: HashMap::from([(
                    "body".to_string(),
                    vec!["10px".to_string(), "0px".to_string()],
                )]),
                ..MockDriver::default()
            },
            markup: MockValidator {
                messages: vec![MarkupMessage {
                    kind: "error".into(),
                    last_line: 3,
                    message: "Stray end tag.".into(),
                }],
                ..MockValidator::default()
            },
            linter: MockLinter {
                reports: vec![LintFileReport {
                    source: "styles/style.css".into(),
                    warnings: vec![LintWarning {
                        rule: Some("color-no-invalid-hex".into()),
                        line: 1,
                        column: 1,
                        text: "bad hex".into(),
                    }],
                }],
                ..MockLinter::default()
            },
            comparator: MockComparator(55.0),
        };

        let errors = run_tests(dir.path(), "en", &test_config(), &layout_paths(&dir), &collab)
            .await
            .expect("Run failed");

        assert_eq!(
            errors.iter().map(CheckError::id).collect::<Vec<_>>(),
            [
                "w3c",
                "stylelint.color-no-invalid-hex",
                "orderStylesheetLinks",
                "alternativeFonts",
                "semanticTagsMissing",
                "langAttrMissing",
                "titleEmmet",
                "notResetMargins",
                "logoWrapper",
                "prefixForEmailAndPhone",
                "layoutDifferent",
            ]
        );
    }

    #[compio::test]
    async fn check_failure_rejects_the_run_but_still_closes_the_page() {
        let dir = TempDir::new().expect("temp dir");
        write_project(&dir, "body { margin: 0; }");
        let collab = Collaborators {
            page: MockDriver {
                existing: conforming_selectors(),
                title: "Museum".into(),
                load_order_ok: true,
                fail_evaluate: true,
                ..MockDriver::default()
            },
            markup: MockValidator::default(),
            linter: MockLinter::default(),
            comparator: MockComparator(0.0),
        };

        let result = run_tests(dir.path(), "en", &test_config(), &layout_paths(&dir), &collab).await;

        assert!(result.is_err());
        assert_eq!(collab.page.closes.get(), 1);
    }

    #[compio::test]
    async fn close_failure_after_success_rejects_the_run() {
        let dir = TempDir::new().expect("temp dir");
        write_project(&dir, "body { margin: 0; font-family: Arial; }");
        let collab = Collaborators {
            page: MockDriver {
                existing: conforming_selectors(),
                title: "Museum".into(),
                load_order_ok: true,
                fail_close: true,
                ..MockDriver::default()
            },
            markup: MockValidator::default(),
            linter: MockLinter::default(),
            comparator: MockComparator(0.0),
        };

        let result = run_tests(dir.path(), "en", &test_config(), &layout_paths(&dir), &collab).await;
        assert!(matches!(result, Err(RunError::PageFailed { .. })));
    }
}
