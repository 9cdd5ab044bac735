//! Bodega core library — domain types and the cell-value sanitizer.
//!
//! Public API surface:
//! - [`types`] — newtypes, row records, outcomes, column addressing
//! - [`sanitize`] — filesystem-safe normalization of spreadsheet cell values

pub mod sanitize;
pub mod types;

pub use sanitize::sanitize_component;
pub use types::{BucketName, ColumnMap, ObjectName, RowOutcome, RowRecord};
