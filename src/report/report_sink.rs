use std::fs::{self, File};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::filesystem::ReportLine;

/// Writes every report line to stdout and to the report file.
///
/// The file is recreated when the sink is opened and flushed by [`ReportSink::finish`].
pub struct ReportSink<W = Stdout> {
    path: PathBuf,
    file: BufWriter<File>,
    console: W,
    colorize: bool,
}

impl ReportSink<Stdout> {
    pub fn create(path: &Path, colorize: bool) -> Result<Self, ReportError> {
        Self::with_console(path, io::stdout(), colorize)
    }
}

impl<W: Write> ReportSink<W> {
    pub fn with_console(path: &Path, console: W, colorize: bool) -> Result<Self, ReportError> {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed previous report {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).context(RemoveSnafu { path }),
        }

        let file = File::create(path).context(CreateSnafu { path })?;
        debug!("Writing report to {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file: BufWriter::new(file),
            console,
            colorize,
        })
    }

    pub fn write_line(&mut self, line: &ReportLine<'_>) -> Result<(), ReportError> {
        let plain = line.to_string();
        let shown = if self.colorize { line.painted() } else { plain.clone() };

        writeln!(self.console, "{shown}").context(ConsoleSnafu)?;
        writeln!(self.file, "{plain}").context(WriteSnafu { path: &self.path })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), ReportError> {
        self.console.flush().context(ConsoleSnafu)?;
        self.file.flush().context(WriteSnafu { path: &self.path })?;
        debug!("Report written to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Failed to remove previous report file {}", path.display()))]
    RemoveError {
        path: PathBuf,
        source: io::Error,
    },
    #[snafu(display("Failed to create report file {}", path.display()))]
    CreateError {
        path: PathBuf,
        source: io::Error,
    },
    #[snafu(display("Failed to write to report file {}", path.display()))]
    WriteError {
        path: PathBuf,
        source: io::Error,
    },
    #[snafu(display("Failed to write report to stdout"))]
    ConsoleError { source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{DepthLimit, DirTree};
    use tempfile::TempDir;

    fn sample_tree(dir: &Path) -> DirTree {
        fs::create_dir(dir.join("tree")).unwrap();
        fs::write(dir.join("tree/one"), vec![0u8; 1200]).unwrap();
        fs::write(dir.join("tree/two"), vec![0u8; 800]).unwrap();
        DirTree::build(dir.join("tree")).expect("Failed to build tree")
    }

    #[test]
    fn mirrors_console_and_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = sample_tree(temp_dir.path());
        let report = temp_dir.path().join("output.txt");

        let mut console = Vec::new();
        let mut sink =
            ReportSink::with_console(&report, &mut console, false).expect("Failed to open sink");
        for line in tree.render(DepthLimit::UNLIMITED) {
            sink.write_line(&line).expect("Failed to write line");
        }
        sink.finish().expect("Failed to finish report");

        let written = fs::read_to_string(&report).expect("Failed to read report");
        assert_eq!(written, String::from_utf8(console).unwrap());
        assert_eq!(written.lines().count(), 3);
        assert!(written.ends_with("  -  800 [████      ] : two\n"));
    }

    #[test]
    fn replaces_previous_report() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = sample_tree(temp_dir.path());
        let report = temp_dir.path().join("output.txt");
        fs::write(&report, "stale line\n".repeat(50)).unwrap();

        let mut sink =
            ReportSink::with_console(&report, io::sink(), false).expect("Failed to open sink");
        for line in tree.render(DepthLimit::at_most(0)) {
            sink.write_line(&line).expect("Failed to write line");
        }
        sink.finish().expect("Failed to finish report");

        let written = fs::read_to_string(&report).expect("Failed to read report");
        assert!(!written.contains("stale"));
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn file_stays_plain_when_console_is_colored() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = sample_tree(temp_dir.path());
        let report = temp_dir.path().join("output.txt");

        let mut sink =
            ReportSink::with_console(&report, io::sink(), true).expect("Failed to open sink");
        for line in tree.render(DepthLimit::UNLIMITED) {
            sink.write_line(&line).expect("Failed to write line");
        }
        sink.finish().expect("Failed to finish report");

        let written = fs::read_to_string(&report).expect("Failed to read report");
        assert!(!written.contains('\u{1b}'));
    }

    #[test]
    fn create_fails_in_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = temp_dir.path().join("missing/output.txt");

        let result = ReportSink::with_console(&report, io::sink(), false);

        assert!(matches!(result, Err(ReportError::CreateError { .. })));
    }
}
