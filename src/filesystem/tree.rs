use std::path::Path;

use crate::ext::PathExt;
use crate::filesystem::{DepthLimit, HiddenProgress, Render, ScanError, Scanner};

/// One file or directory together with its aggregated size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTree {
    name: String,
    size: u64,
    children: Vec<DirTree>,
}

impl DirTree {
    /// Walks `path` with the default scanner: fail-fast, no progress display.
    pub fn build(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        Scanner::<HiddenProgress>::default().scan(path.as_ref())
    }

    pub(super) fn file(path: &Path, size: u64) -> Self {
        Self {
            name: path.display().to_string(),
            size,
            children: Vec::new(),
        }
    }

    pub(super) fn directory(path: &Path) -> Self {
        Self::file(path, 0)
    }

    /// Takes ownership of `child`, relabels it with its base name and adds its
    /// size to this node.
    pub(super) fn attach(&mut self, mut child: DirTree) {
        child.name = Path::new(&child.name).base_name();
        self.size += child.size;
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Children in discovery order.
    pub fn children(&self) -> &[DirTree] {
        &self.children
    }

    /// Report lines for this tree, root first, without a bar on the root line.
    pub fn render(&self, depth_limit: DepthLimit) -> Render<'_> {
        Render::new(self, 0, depth_limit, 0)
    }
}
