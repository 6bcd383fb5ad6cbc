//! Files written by a run: chunks, stylesheet, preview page and report

pub mod preview;
pub mod report;
pub mod storage;

pub use preview::{render_preview, PREVIEW_FILE_NAME};
pub use report::{ReportEntry, RunReport, REPORT_FILE_NAME};
pub use storage::{format_size, OutputDir, PersistSummary};
