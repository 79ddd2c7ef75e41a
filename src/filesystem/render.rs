use std::fmt;
use std::iter::FusedIterator;

use colored::Colorize;

use crate::filesystem::DirTree;
use crate::format::{human_size, progress_bar};

const INDENT: &str = "  ";
const BULLET: &str = "- ";
const DELIMITER: &str = ": ";
const SIZE_COLUMNS: usize = 4;
const BAR_WIDTH: usize = 10;

/// How deep rendering descends. The root is at depth 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthLimit(Option<usize>);

impl DepthLimit {
    pub const UNLIMITED: Self = Self(None);

    pub fn at_most(depth: usize) -> Self {
        Self(Some(depth))
    }

    pub fn allows(self, depth: usize) -> bool {
        self.0.is_none_or(|limit| depth <= limit)
    }
}

/// Negative values mean unlimited.
impl From<i64> for DepthLimit {
    fn from(value: i64) -> Self {
        match usize::try_from(value) {
            Ok(depth) => Self::at_most(depth),
            Err(_) => Self::UNLIMITED,
        }
    }
}

/// One line of the usage report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine<'a> {
    depth: usize,
    size: String,
    bar: Option<String>,
    name: &'a str,
}

impl<'a> ReportLine<'a> {
    fn new(node: &'a DirTree, parent_size: u64, depth: usize) -> Self {
        Self {
            depth,
            size: human_size(node.size()),
            bar: (parent_size > 0).then(|| progress_bar(node.size(), parent_size, BAR_WIDTH)),
            name: node.name(),
        }
    }

    /// The same line with terminal colours applied to the size and the bar.
    pub fn painted(&self) -> String {
        let mut line = String::new();
        self.write_layout(
            &mut line,
            self.padded_size().bold(),
            self.bar.as_deref().map(|bar| bar.cyan()),
        )
        .map(|()| line)
        .unwrap_or_default()
    }

    fn padded_size(&self) -> String {
        format!("{:>SIZE_COLUMNS$}", self.size)
    }

    fn write_layout(
        &self,
        out: &mut impl fmt::Write,
        size: impl fmt::Display,
        bar: Option<impl fmt::Display>,
    ) -> fmt::Result {
        write!(out, "{}{BULLET}{size}", INDENT.repeat(self.depth))?;
        if let Some(bar) = bar {
            write!(out, " [{bar}] ")?;
        }
        write!(out, "{DELIMITER}{}", self.name)
    }
}

impl fmt::Display for ReportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_layout(f, self.padded_size(), self.bar.as_deref())
    }
}

struct Frame<'a> {
    node: &'a DirTree,
    parent_size: u64,
    depth: usize,
}

/// Lazy pre-order walk over a [`DirTree`], largest child first.
///
/// Children are sorted into a borrowed list when their parent is visited; the
/// tree itself is never reordered, so rendering the same tree twice yields the
/// same lines.
pub struct Render<'a> {
    stack: Vec<Frame<'a>>,
    depth_limit: DepthLimit,
}

impl<'a> Render<'a> {
    pub fn new(node: &'a DirTree, parent_size: u64, depth_limit: DepthLimit, depth: usize) -> Self {
        let mut stack = Vec::new();
        if depth_limit.allows(depth) {
            stack.push(Frame {
                node,
                parent_size,
                depth,
            });
        }
        Self { stack, depth_limit }
    }
}

impl<'a> Iterator for Render<'a> {
    type Item = ReportLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Frame {
            node,
            parent_size,
            depth,
        } = self.stack.pop()?;

        if self.depth_limit.allows(depth + 1) {
            let mut children: Vec<&DirTree> = node.children().iter().collect();
            // Stable: equal sizes keep discovery order.
            children.sort_by(|a, b| b.size().cmp(&a.size()));
            self.stack.extend(children.into_iter().rev().map(|child| Frame {
                node: child,
                parent_size: node.size(),
                depth: depth + 1,
            }));
        }

        Some(ReportLine::new(node, parent_size, depth))
    }
}

impl FusedIterator for Render<'_> {}
