use std::path::Path;

use crate::drivers::{LintError, StyleLinter};
use crate::report::CheckError;

/// Syntax errors the linter could not attribute to a rule still need a name
/// in the `stylelint.<rule>` taxonomy.
const UNATTRIBUTED_RULE: &str = "parseError";

/// Lints every stylesheet matching the glob; one result per warning.
pub async fn check_stylesheets<L: StyleLinter>(
    linter: &L,
    config: &Path,
    file_glob: &str,
) -> Result<Vec<CheckError>, LintError> {
    let reports = linter.lint(config, file_glob).await?;
    Ok(reports
        .into_iter()
        .flat_map(|report| report.warnings)
        .map(|warning| CheckError::Stylelint {
            rule: warning
                .rule
                .unwrap_or_else(|| UNATTRIBUTED_RULE.to_string()),
            line: warning.line,
            column: warning.column,
            text: warning.text,
        })
        .collect())
}
