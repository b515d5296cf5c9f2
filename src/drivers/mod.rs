//! Collaborator interfaces the checks run against, plus their production
//! implementations: a headless-Chromium page driver, the Nu Html Checker and
//! stylelint CLIs driven as subprocesses, and a pixel image comparator.
//!
//! The checks only ever see the traits; tests substitute mocks.

mod chromium;
mod compare;
mod markup;
mod page;
mod pixel;
mod stylelint;
mod stylelint_cli;
mod vnu;

pub use chromium::ChromiumDriver;
pub use compare::{CompareError, CompareOptions, Comparison, ImageComparator};
pub use markup::{MarkupError, MarkupMessage, MarkupValidator};
pub use page::{PageDriver, PageError};
pub use pixel::PixelComparator;
pub use stylelint::{LintError, LintFileReport, LintWarning, StyleLinter};
pub use stylelint_cli::StylelintCli;
pub use vnu::VnuValidator;

use compio::process::Command;
use std::process::Stdio;

/// Builds a command that runs `command_line` through the platform shell,
/// stdout and stderr piped. Same shape for every subprocess collaborator.
pub(crate) fn shell_command(command_line: &str) -> Command {
    #[cfg(target_family = "windows")]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    };
    #[cfg(target_family = "unix")]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    };
    let _ = cmd.stdout(Stdio::piped());
    let _ = cmd.stderr(Stdio::piped());
    cmd
}

/// Encodes a string as a JS literal for interpolation into page expressions.
pub(crate) fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_default()
}
