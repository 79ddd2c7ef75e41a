//! Directory size tree.
//!
//! A [`DirTree`] is built bottom-up by a depth-first [`Scanner`] walk, each
//! directory carrying the total size of the files beneath it, and is then
//! rendered as an indented report with [`Render`].

mod progress;
mod render;
mod scanner;
mod tree;

pub use progress::{HiddenProgress, ScanProgress, TerminalProgress};
pub use render::{DepthLimit, Render, ReportLine};
pub use scanner::{ErrorPolicy, ScanError, Scanner};
pub use tree::DirTree;
