//! Domain types for manifest-driven bucket reconciliation.

use std::fmt;

use crate::sanitize::sanitize_component;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed object-storage bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(pub String);

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BucketName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BucketName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The full stored name of an object inside a bucket, as returned by the
/// storage service. Opaque to this system; never constructed from guesses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(pub String);

impl ObjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ObjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Column addressing
// ---------------------------------------------------------------------------

/// 1-indexed spreadsheet column numbers for the five manifest fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: u32,
    pub folder: u32,
    pub filename: u32,
    pub display_name: u32,
    pub status: u32,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: 1,
            folder: 2,
            filename: 3,
            display_name: 4,
            status: 5,
        }
    }
}

impl ColumnMap {
    /// All five columns must be 1-indexed; zero is never a valid column.
    pub fn is_valid(&self) -> bool {
        self.id >= 1
            && self.folder >= 1
            && self.filename >= 1
            && self.display_name >= 1
            && self.status >= 1
    }
}

// ---------------------------------------------------------------------------
// Row record
// ---------------------------------------------------------------------------

/// One manifest row, sanitized and ready for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// 1-indexed spreadsheet row this record came from (row 1 is the header).
    pub row: u32,
    /// Grouping key; becomes the local subfolder name.
    pub id: String,
    /// Logical folder prefix inside the bucket.
    pub folder: String,
    /// Expected leaf object name.
    pub filename: String,
    /// Local file name to write; may differ from `filename`.
    pub display_name: String,
}

impl RowRecord {
    /// Build a record from raw cell values, sanitizing every field.
    pub fn from_cells(
        row: u32,
        id: &str,
        folder: &str,
        filename: &str,
        display_name: &str,
    ) -> Self {
        Self {
            row,
            id: sanitize_component(id),
            folder: sanitize_component(folder),
            filename: sanitize_component(filename),
            display_name: sanitize_component(display_name),
        }
    }

    /// Local subfolder for this record: the id, or `row_<n>` when absent.
    pub fn subfolder(&self) -> String {
        if self.id.is_empty() {
            format!("row_{}", self.row)
        } else {
            self.id.clone()
        }
    }

    /// Local file name to write: the display name, or `filename` when absent.
    pub fn output_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.filename
        } else {
            &self.display_name
        }
    }
}

// ---------------------------------------------------------------------------
// Row outcome
// ---------------------------------------------------------------------------

/// Terminal outcome of processing one manifest row. Every row ends in exactly
/// one of these; each maps to a distinct status cell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Object resolved and written to the local tree.
    Downloaded,
    /// The folder cell was empty; no storage calls were made.
    FolderEmpty,
    /// The filename cell was empty; no storage calls were made.
    FilenameEmpty,
    /// The folder prefix has zero objects in storage.
    FolderNotFound,
    /// The folder exists but neither exact nor suffix lookup matched.
    ObjectNotFound,
    /// An object name was resolved but fetching or writing it failed.
    DownloadFailed(String),
    /// A storage call failed mid-row; the row is not definitively absent.
    RowError(String),
}

impl RowOutcome {
    /// The string written into the manifest's status column.
    pub fn status_cell(&self) -> String {
        match self {
            RowOutcome::Downloaded => "YES".to_string(),
            RowOutcome::FolderEmpty => "NO - folder empty".to_string(),
            RowOutcome::FilenameEmpty => "NO - filename empty".to_string(),
            RowOutcome::FolderNotFound => "NO - folder not found".to_string(),
            RowOutcome::ObjectNotFound => "NO - object not found".to_string(),
            RowOutcome::DownloadFailed(cause) => format!("NO - download failed: {cause}"),
            RowOutcome::RowError(cause) => format!("NO - general error: {cause}"),
        }
    }

    /// Whether this outcome counts toward the run's `found` counter.
    pub fn is_found(&self) -> bool {
        matches!(self, RowOutcome::Downloaded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
