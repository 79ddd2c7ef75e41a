//! Pure text formatting for the usage report.

mod bar;
mod size;

pub use bar::progress_bar;
pub use size::human_size;
