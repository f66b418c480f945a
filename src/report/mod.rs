//! Terminal report formatting.

mod format;

pub use format::format_run_summary;
