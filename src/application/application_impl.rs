use snafu::prelude::*;
use tracing::debug;
use tracing::info;

use crate::application::RuntimeConfig;
use crate::config::CheckConfig;
use crate::config::CheckConfigError;
use crate::drivers::ChromiumDriver;
use crate::drivers::PixelComparator;
use crate::drivers::StylelintCli;
use crate::drivers::VnuValidator;
use crate::report::render_report;
use crate::runner::Collaborators;
use crate::runner::LayoutPaths;
use crate::runner::RunError;
use crate::runner::run_tests;

pub struct Application;

impl Application {
    /// Runs the full check suite and prints the report.
    ///
    /// Returns whether the submission passed every check. Infrastructure
    /// failures surface as `ApplicationError`; rule violations do not.
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<bool, ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let check_config = CheckConfig::read(&app_config.config_path)
            .await
            .context(CheckConfigSnafu)?;
        debug!("Loaded check configuration: {:?}", check_config);

        // Layout artifacts go into a per-run directory so independent runs
        // never collide; it is cleaned up when the run ends.
        let work_dir = tempfile::tempdir().context(WorkDirSnafu)?;
        let layout = LayoutPaths::in_dir(work_dir.path(), app_config.reference.clone());

        let collaborators = Collaborators {
            page: ChromiumDriver::new(),
            markup: VnuValidator::default(),
            linter: StylelintCli::default(),
            comparator: PixelComparator,
        };

        let errors = run_tests(
            &app_config.root,
            &app_config.lang,
            &check_config,
            &layout,
            &collaborators,
        )
        .await
        .context(RunFailedSnafu)?;
        info!("Checks finished with {} errors", errors.len());

        render_report(&errors);
        Ok(errors.is_empty())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    CheckConfigError { source: CheckConfigError },
    #[snafu(display("Failed to create the working directory for layout artifacts"))]
    WorkDirError { source: std::io::Error },
    #[snafu(display("Critical failure encountered during the check run"))]
    RunFailed { source: RunError },
}
