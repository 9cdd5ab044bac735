//! Row orchestration: drive the manifest row by row through sanitize →
//! locate → download, write per-row statuses, and checkpoint the workbook.

pub mod error;
pub mod run;

pub use error::PipelineError;
pub use run::{run, RunOptions, RunSummary};
