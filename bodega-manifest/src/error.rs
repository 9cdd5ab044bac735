//! Error types for bodega-manifest.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file did not exist at the expected path.
    #[error("manifest not found at {path}")]
    NotFound { path: PathBuf },

    /// The workbook could not be read or parsed.
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },

    /// The workbook has no worksheet to operate on.
    #[error("manifest at {path} has no worksheet")]
    NoWorksheet { path: PathBuf },

    /// Neither the primary path nor the backup path could be written.
    #[error("failed to save manifest to {primary} or backup {backup}: {source}")]
    Write {
        primary: PathBuf,
        backup: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },
}
