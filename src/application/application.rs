use std::io::IsTerminal;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::config::{Settings, SettingsError};
use crate::filesystem::{DirTree, HiddenProgress, ScanError, ScanProgress, Scanner, TerminalProgress};
use crate::report::{ReportError, ReportSink};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(cli.config.as_deref())
            .await
            .context(SettingsSnafu)?;
        let config = RuntimeConfig::new(cli, settings);
        debug!("Resolved runtime config: {:?}", config);

        let tree = if config.progress && std::io::stderr().is_terminal() {
            Self::scan(&config, TerminalProgress::new())?
        } else {
            Self::scan(&config, HiddenProgress)?
        };

        let colorize = supports_color::on(supports_color::Stream::Stdout).is_some();
        let mut sink = ReportSink::create(&config.report_file, colorize).context(ReportSnafu)?;
        let mut lines = 0usize;
        for line in tree.render(config.depth_limit) {
            sink.write_line(&line).context(ReportSnafu)?;
            lines += 1;
        }
        sink.finish().context(ReportSnafu)?;
        info!(
            "Wrote {} lines to {}",
            lines,
            config.report_file.display()
        );

        Ok(())
    }

    fn scan(config: &RuntimeConfig, progress: impl ScanProgress) -> Result<DirTree, ApplicationError> {
        Scanner::new(config.error_policy, progress)
            .scan(&config.root)
            .context(ScanSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Critical failure encountered while scanning the directory tree"))]
    ScanError { source: ScanError },
    #[snafu(display("Critical failure encountered while writing the report"))]
    ReportError { source: ReportError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    #[compio::test]
    async fn run_writes_report_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("data");
        std::fs::create_dir_all(root.join("logs")).unwrap();
        std::fs::write(root.join("logs/app.log"), vec![0u8; 3_000]).unwrap();
        std::fs::write(root.join("readme"), vec![0u8; 1_000]).unwrap();
        let report = temp_dir.path().join("report.txt");
        let settings = temp_dir.path().join("settings.yaml");
        std::fs::write(&settings, "progress: false\n").unwrap();

        let cli = Cli::try_parse_from([
            OsStr::new("dirsize"),
            root.as_os_str(),
            OsStr::new("1"),
            OsStr::new("--output"),
            report.as_os_str(),
            OsStr::new("--config"),
            settings.as_os_str(),
        ])
        .expect("Failed to parse");

        Application::run(cli).await.expect("Run failed");

        let written = std::fs::read_to_string(&report).expect("Failed to read report");
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("- 4.0K: {}", root.display()));
        assert_eq!(lines[1], "  - 3.0K [███████▌  ] : logs");
        assert_eq!(lines[2], "  - 1.0K [██▌       ] : readme");
    }

    #[compio::test]
    async fn run_fails_on_missing_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");
        let report = temp_dir.path().join("report.txt");

        let cli = Cli::try_parse_from([
            OsStr::new("dirsize"),
            missing.as_os_str(),
            OsStr::new("--output"),
            report.as_os_str(),
            OsStr::new("--no-progress"),
        ])
        .expect("Failed to parse");

        let result = Application::run(cli).await;

        assert!(matches!(result, Err(ApplicationError::ScanError { .. })));
        assert!(!report.exists(), "no report is written when the scan fails");
    }
}
