//! Workbook wrapper around the manifest spreadsheet.
//!
//! Row 1 is the header and is never touched; data rows are `2..=last_row()`.
//! The status column is the only cell this module ever mutates, so a save can
//! run many times per pass without disturbing the rest of the sheet.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

use bodega_core::ColumnMap;

use crate::error::ManifestError;

/// Raw (unsanitized) cell text for the four input fields of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub id: String,
    pub folder: String,
    pub filename: String,
    pub display_name: String,
}

/// Where a save actually landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedTo {
    /// The original manifest path.
    Primary(PathBuf),
    /// The `<stem>_backup.<ext>` sibling; the primary path was unwritable.
    Backup(PathBuf),
}

impl SavedTo {
    pub fn path(&self) -> &Path {
        match self {
            SavedTo::Primary(p) | SavedTo::Backup(p) => p,
        }
    }
}

/// An open manifest workbook plus the column layout used to address it.
pub struct Manifest {
    book: Spreadsheet,
    path: PathBuf,
    columns: ColumnMap,
}

impl Manifest {
    /// Open the workbook at `path`. The first worksheet is the manifest.
    pub fn open(path: impl Into<PathBuf>, columns: ColumnMap) -> Result<Self, ManifestError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ManifestError::NotFound { path });
        }
        let book = reader::xlsx::read(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        if book.get_sheet(&0).is_none() {
            return Err(ManifestError::NoWorksheet { path });
        }
        Ok(Self {
            book,
            path,
            columns,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Highest populated row (1 when the sheet holds only the header).
    pub fn last_row(&self) -> u32 {
        self.book
            .get_sheet(&0)
            .map_or(1, |ws| ws.get_highest_row())
    }

    /// Number of data rows (excludes the header).
    pub fn data_row_count(&self) -> u32 {
        self.last_row().saturating_sub(1)
    }

    /// Raw cell text for the configured input columns of `row`.
    pub fn read_row(&self, row: u32) -> Result<RawRow, ManifestError> {
        let ws = self.sheet()?;
        Ok(RawRow {
            id: ws.get_value((self.columns.id, row)),
            folder: ws.get_value((self.columns.folder, row)),
            filename: ws.get_value((self.columns.filename, row)),
            display_name: ws.get_value((self.columns.display_name, row)),
        })
    }

    /// Overwrite the status cell of `row`.
    pub fn write_status(&mut self, row: u32, status: &str) -> Result<(), ManifestError> {
        let col = self.columns.status;
        let ws = self.sheet_mut()?;
        ws.get_cell_mut((col, row)).set_value(status);
        Ok(())
    }

    /// `<stem>_backup.<ext>` sibling of the manifest path.
    pub fn backup_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let backup_name = match self.path.extension() {
            Some(ext) => format!("{stem}_backup.{}", ext.to_string_lossy()),
            None => format!("{stem}_backup"),
        };
        self.path.with_file_name(backup_name)
    }

    /// Persist all in-memory changes.
    ///
    /// Tries the original path first. If that write fails (typically the file
    /// is open in a spreadsheet application), writes the backup sibling
    /// instead so no computed status is lost. Only a double failure is an
    /// error.
    pub fn save(&self) -> Result<SavedTo, ManifestError> {
        match writer::xlsx::write(&self.book, &self.path) {
            Ok(()) => Ok(SavedTo::Primary(self.path.clone())),
            Err(primary_err) => {
                let backup = self.backup_path();
                tracing::warn!(
                    "manifest at {} not writable ({primary_err}); saving backup to {}",
                    self.path.display(),
                    backup.display()
                );
                match writer::xlsx::write(&self.book, &backup) {
                    Ok(()) => Ok(SavedTo::Backup(backup)),
                    Err(source) => Err(ManifestError::Write {
                        primary: self.path.clone(),
                        backup,
                        source,
                    }),
                }
            }
        }
    }

    fn sheet(&self) -> Result<&Worksheet, ManifestError> {
        self.book
            .get_sheet(&0)
            .ok_or_else(|| ManifestError::NoWorksheet {
                path: self.path.clone(),
            })
    }

    fn sheet_mut(&mut self) -> Result<&mut Worksheet, ManifestError> {
        let path = self.path.clone();
        self.book
            .get_sheet_mut(&0)
            .ok_or(ManifestError::NoWorksheet { path })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
