use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Root directory of the submission under check
    pub root: PathBuf,

    /// Expected value of the html lang attribute
    #[clap(long, short, default_value = "en")]
    pub lang: String,

    /// Reference layout image the rendered page is compared against
    #[clap(long, short, default_value = "layout.png")]
    pub reference: PathBuf,

    /// Check configuration file (built-in defaults when absent)
    #[clap(long, short, default_value = "checks.yaml")]
    pub config: PathBuf,

    #[clap(long, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
