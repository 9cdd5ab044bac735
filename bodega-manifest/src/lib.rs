//! Spreadsheet manifest access — open, read rows, write statuses, and persist
//! with a backup-path fallback when the primary file is locked.

pub mod checkpoint;
pub mod error;
pub mod workbook;

pub use checkpoint::CheckpointPolicy;
pub use error::ManifestError;
pub use workbook::{Manifest, RawRow, SavedTo};
