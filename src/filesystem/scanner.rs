use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, trace, warn};

use crate::filesystem::{DirTree, HiddenProgress, ScanProgress};
use crate::format::human_size;

/// What the walk does when an entry cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum ErrorPolicy {
    /// Abort the whole walk on the first error.
    #[default]
    #[display("fail")]
    FailFast,
    /// Drop the unreadable entry, log a warning and keep going.
    #[display("skip")]
    Skip,
}

/// Depth-first filesystem walker producing a [`DirTree`].
///
/// Each directory is fully built before it is handed to its parent, so sizes
/// are final by the time a subtree is attached.
pub struct Scanner<P = HiddenProgress> {
    policy: ErrorPolicy,
    progress: P,
}

impl Default for Scanner<HiddenProgress> {
    fn default() -> Self {
        Self::new(ErrorPolicy::default(), HiddenProgress)
    }
}

impl<P: ScanProgress> Scanner<P> {
    pub fn new(policy: ErrorPolicy, progress: P) -> Self {
        Self { policy, progress }
    }

    /// Builds the tree rooted at `root`. The root node keeps `root` as its name.
    ///
    /// Failing to list `root` itself is an error under every policy.
    pub fn scan(&mut self, root: &Path) -> Result<DirTree, ScanError> {
        debug!("Scanning {} with error policy '{}'", root.display(), self.policy);
        let tree = self.scan_dir(root, 0)?;
        info!(
            "Scanned {}: {} in {} top-level entries",
            root.display(),
            human_size(tree.size()),
            tree.children().len()
        );
        Ok(tree)
    }

    fn scan_dir(&mut self, path: &Path, depth: usize) -> Result<DirTree, ScanError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).context(ReadDirSnafu { path })? {
            match entry.context(ReadEntrySnafu { path }) {
                Ok(entry) => entries.push(entry),
                Err(error) => self.recover(error)?,
            }
        }

        self.progress.enter(path, depth, entries.len());
        let mut node = DirTree::directory(path);
        for entry in entries {
            match self.scan_entry(&entry, depth) {
                Ok(Some(child)) => node.attach(child),
                Ok(None) => {}
                Err(error) => self.recover(error)?,
            }
            self.progress.advance(depth);
        }
        self.progress.leave(depth);

        Ok(node)
    }

    fn scan_entry(&mut self, entry: &DirEntry, depth: usize) -> Result<Option<DirTree>, ScanError> {
        let path = entry.path();
        // Not following symlinks: a link is neither a file nor a directory here.
        let file_type = entry.file_type().context(MetadataSnafu { path: &path })?;

        if file_type.is_file() {
            let size = entry.metadata().context(MetadataSnafu { path: &path })?.len();
            Ok(Some(DirTree::file(&path, size)))
        } else if file_type.is_dir() {
            self.scan_dir(&path, depth + 1).map(Some)
        } else {
            trace!("Ignoring {} ({:?})", path.display(), file_type);
            Ok(None)
        }
    }

    fn recover(&self, error: ScanError) -> Result<(), ScanError> {
        match self.policy {
            ErrorPolicy::FailFast => Err(error),
            ErrorPolicy::Skip => {
                warn!("Skipping: {}", snafu::Report::from_error(&error));
                Ok(())
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ScanError {
    #[snafu(display("Failed to list directory {}", path.display()))]
    ReadDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read an entry of directory {}", path.display()))]
    ReadEntryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read metadata of {}", path.display()))]
    MetadataError {
        path: PathBuf,
        source: std::io::Error,
    },
}
