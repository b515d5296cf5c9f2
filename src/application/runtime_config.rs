use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub lang: String,
    pub reference: PathBuf,
    pub config_path: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            lang: cli.lang,
            reference: cli.reference,
            config_path: cli.config,
        }
    }
}
