use std::path::Path;

use serde::Deserialize;
use snafu::Snafu;

/// External stylesheet linter interface.
pub trait StyleLinter {
    /// Lints every file matching `file_glob` with the given linter
    /// configuration, one report per file.
    async fn lint(
        &self,
        config: &Path,
        file_glob: &str,
    ) -> Result<Vec<LintFileReport>, LintError>;
}

/// Per-file lint report in the stylelint JSON formatter shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LintFileReport {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub warnings: Vec<LintWarning>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LintWarning {
    /// Absent for syntax errors the linter could not attribute to a rule.
    pub rule: Option<String>,
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub column: u64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LintError {
    #[snafu(display("Failed to spawn the stylesheet linter '{command}'"))]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed talking to the stylesheet linter"))]
    IoError { source: std::io::Error },
    #[snafu(display("Failed to wait for the stylesheet linter"))]
    WaitError { source: std::io::Error },
    #[snafu(display("Stylesheet linter failed (exit code {status}): {detail}"))]
    LinterError { status: i32, detail: String },
}
