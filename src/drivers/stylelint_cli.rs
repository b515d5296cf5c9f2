use std::path::Path;

use compio::io::compat::AsyncStream;
use futures::AsyncReadExt;
use snafu::ResultExt;
use tracing::debug;

use crate::drivers::shell_command;
use crate::drivers::stylelint::{
    IoSnafu, LintError, LintFileReport, SpawnSnafu, StyleLinter, WaitSnafu,
};
use crate::ext::BestEffortPathExt;

/// Stylesheet linter shelling out to the stylelint CLI.
///
/// stylelint exits non-zero when it finds violations, so success is judged
/// by whether stdout parses as the JSON formatter output, not by the status.
pub struct StylelintCli {
    command: String,
}

impl StylelintCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for StylelintCli {
    fn default() -> Self {
        Self::new("npx stylelint")
    }
}

impl StyleLinter for StylelintCli {
    async fn lint(
        &self,
        config: &Path,
        file_glob: &str,
    ) -> Result<Vec<LintFileReport>, LintError> {
        let command_line = format!(
            "{} --config '{}' --formatter json '{}'",
            self.command,
            config.best_effort_path_display(),
            file_glob,
        );
        debug!("Running stylesheet linter: {}", command_line);

        let mut handle = shell_command(&command_line).spawn().context(SpawnSnafu {
            command: self.command.clone(),
        })?;

        let mut stdout_text = String::new();
        let mut stderr_text = String::new();
        let stdout = handle.stdout.take();
        let stderr = handle.stderr.take();
        let stdout_read = async {
            match stdout {
                Some(stdout) => AsyncStream::new(stdout)
                    .read_to_string(&mut stdout_text)
                    .await
                    .map(|_| ()),
                None => Ok(()),
            }
        };
        let stderr_read = async {
            match stderr {
                Some(stderr) => AsyncStream::new(stderr)
                    .read_to_string(&mut stderr_text)
                    .await
                    .map(|_| ()),
                None => Ok(()),
            }
        };
        let (stdout_res, stderr_res) = futures::join!(stdout_read, stderr_read);
        stdout_res.context(IoSnafu)?;
        stderr_res.context(IoSnafu)?;

        let status = handle.wait().await.context(WaitSnafu)?;

        // Newer stylelint wraps the reports; older versions emit a bare array.
        let reports = serde_json::from_str::<Vec<LintFileReport>>(&stdout_text).or_else(|_| {
            serde_json::from_str::<serde_json::Value>(&stdout_text).and_then(|value| {
                serde_json::from_value(value.get("results").cloned().unwrap_or_default())
            })
        });

        match reports {
            Ok(reports) => {
                debug!("Stylesheet linter produced {} file reports", reports.len());
                Ok(reports)
            }
            Err(_) => Err(LintError::LinterError {
                status: status.code().unwrap_or(-1),
                detail: stderr_text.trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_reports_parse_the_json_formatter_shape() {
        let raw = r#"[{
            "source": "styles/style.css",
            "warnings": [
                {"rule": "color-no-invalid-hex", "line": 3, "column": 10, "text": "Unexpected invalid hex color", "severity": "error"},
                {"rule": null, "line": 1, "column": 1, "text": "Unknown word"}
            ]
        }]"#;
        let reports: Vec<LintFileReport> = serde_json::from_str(raw).expect("Failed to parse");

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].source, "styles/style.css");
        assert_eq!(
            reports[0].warnings[0].rule.as_deref(),
            Some("color-no-invalid-hex")
        );
        assert_eq!(reports[0].warnings[1].rule, None);
    }
}
