use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Settings;
use crate::ext::lexical_absolute;
use crate::filesystem::{DepthLimit, ErrorPolicy};

const DEFAULT_REPORT_FILE: &str = "output.txt";

/// Effective options for one run: command line first, then the settings file,
/// then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Absolute path of the directory to measure.
    pub root: PathBuf,
    pub depth_limit: DepthLimit,
    pub report_file: PathBuf,
    pub progress: bool,
    pub error_policy: ErrorPolicy,
}

impl RuntimeConfig {
    pub fn new(cli: Cli, settings: Settings) -> Self {
        let root = cli.path.unwrap_or_else(|| PathBuf::from("."));
        let error_policy = if cli.skip_unreadable {
            ErrorPolicy::Skip
        } else {
            settings.on_error.unwrap_or_default()
        };

        Self {
            root: lexical_absolute(&root),
            depth_limit: cli
                .depth
                .or(settings.depth_limit)
                .map(DepthLimit::from)
                .unwrap_or(DepthLimit::UNLIMITED),
            report_file: cli
                .output
                .or(settings.report_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE)),
            progress: !cli.no_progress && settings.progress.unwrap_or(true),
            error_policy,
        }
    }
}
