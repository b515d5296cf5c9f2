use colored::Colorize;

use crate::report::CheckError;

fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Prints the final error list to stdout.
///
/// Message wording belongs to the external reporting layer; this prints the
/// raw id plus the interpolation values, one error per line.
pub fn render_report(errors: &[CheckError]) {
    if errors.is_empty() {
        if color_enabled() {
            println!("{}", "All checks passed".green());
        } else {
            println!("All checks passed");
        }
        return;
    }

    for error in errors {
        let id = error.id();
        let values = error
            .values()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("  ");

        if color_enabled() {
            println!("{}  {}", id.red().bold(), values);
        } else {
            println!("{id}  {values}");
        }
    }
}
