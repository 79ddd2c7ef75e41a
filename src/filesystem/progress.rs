use std::path::Path;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::ext::PathExt;

/// Deepest level that gets its own bar; deeper directories only advance their ancestors.
const MAX_VISIBLE_DEPTH: usize = 1;

/// Receives walk events for interactive feedback. Never consulted for results.
pub trait ScanProgress {
    /// A directory at `depth` has been listed and holds `entries` entries.
    fn enter(&mut self, path: &Path, depth: usize, entries: usize);
    /// One entry of the innermost directory at `depth` has been processed.
    fn advance(&mut self, depth: usize);
    /// The directory at `depth` is done.
    fn leave(&mut self, depth: usize);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenProgress;

impl ScanProgress for HiddenProgress {
    fn enter(&mut self, _path: &Path, _depth: usize, _entries: usize) {}
    fn advance(&mut self, _depth: usize) {}
    fn leave(&mut self, _depth: usize) {}
}

/// Stacked stderr bars for the root directory and its immediate subdirectories.
///
/// The root bar stays on screen once finished; subdirectory bars are cleared.
pub struct TerminalProgress {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            bars: Vec::with_capacity(MAX_VISIBLE_DEPTH + 1),
        }
    }

    fn style(depth: usize) -> ProgressStyle {
        let template = if depth == 0 {
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {wide_msg}"
        } else {
            "  {bar:40.cyan/blue} {pos}/{len} {wide_msg:.dim}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ")
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgress for TerminalProgress {
    fn enter(&mut self, path: &Path, depth: usize, entries: usize) {
        if depth > MAX_VISIBLE_DEPTH {
            return;
        }
        let bar = self.multi.add(ProgressBar::new(entries as u64));
        bar.set_style(Self::style(depth));
        bar.set_message(if depth == 0 {
            path.display().to_string()
        } else {
            path.base_name()
        });
        if depth == 0 {
            bar.enable_steady_tick(Duration::from_millis(200));
        }
        self.bars.push(bar);
    }

    fn advance(&mut self, depth: usize) {
        if depth > MAX_VISIBLE_DEPTH {
            return;
        }
        if let Some(bar) = self.bars.last() {
            bar.inc(1);
        }
    }

    fn leave(&mut self, depth: usize) {
        if depth > MAX_VISIBLE_DEPTH {
            return;
        }
        if let Some(bar) = self.bars.pop() {
            if depth == 0 {
                bar.finish();
            } else {
                bar.finish_and_clear();
                self.multi.remove(&bar);
            }
        }
    }
}
