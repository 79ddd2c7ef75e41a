use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Print the disk usage of a directory tree, largest entries first.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Directory to measure [default: current directory]
    pub path: Option<PathBuf>,

    /// Deepest level to print, the root being 0; negative prints everything
    #[clap(allow_negative_numbers = true)]
    pub depth: Option<i64>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// File the report is mirrored to [default: ./output.txt]
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Settings file [default: ./dirsize.yaml when present]
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Do not show scan progress on stderr
    #[clap(long)]
    pub no_progress: bool,

    /// Skip unreadable entries with a warning instead of aborting
    #[clap(long)]
    pub skip_unreadable: bool,
}
