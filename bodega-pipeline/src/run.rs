//! The manifest pass: strictly sequential, one row at a time.
//!
//! Row-scoped failures (lookup, download, transient storage errors) become a
//! status string and a counter bump; they never abort the pass. The workbook
//! is checkpointed per the configured policy and saved once more at the end,
//! trying the primary path again even if mid-run saves fell back to backup.

use std::path::PathBuf;

use bodega_core::{RowOutcome, RowRecord};
use bodega_manifest::{CheckpointPolicy, Manifest, SavedTo};
use bodega_storage::{download, folder_prefix, locate, Lookup, ObjectStore};

use crate::error::PipelineError;

/// Settings for one manifest pass.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Local root; downloads land at `<base>/<id>/<display_name>`.
    pub base_folder: PathBuf,
    /// Root prefix inside the bucket, joined ahead of each row's folder.
    pub bucket_prefix: String,
    pub checkpoint: CheckpointPolicy,
}

/// Counters for a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: u32,
    pub found: u32,
    pub not_found: u32,
    pub checkpoint_saves: u32,
    /// Where the end-of-pass save landed.
    pub final_save: SavedTo,
}

/// Process every data row of `manifest` against `store`.
pub fn run(
    manifest: &mut Manifest,
    store: &dyn ObjectStore,
    options: &RunOptions,
) -> Result<RunSummary, PipelineError> {
    std::fs::create_dir_all(&options.base_folder).map_err(|source| PipelineError::Io {
        path: options.base_folder.clone(),
        source,
    })?;

    let total = manifest.data_row_count();
    let last = manifest.last_row();
    tracing::info!(
        "manifest {}: {total} data row(s)",
        manifest.path().display()
    );

    let mut found = 0u32;
    let mut not_found = 0u32;
    let mut checkpoint_saves = 0u32;
    let mut rows_done = 0u32;

    for row in 2..=last {
        let raw = manifest.read_row(row)?;
        let record =
            RowRecord::from_cells(row, &raw.id, &raw.folder, &raw.filename, &raw.display_name);
        rows_done += 1;
        tracing::info!(
            "row {rows_done}/{total}: id='{}' folder='{}' filename='{}'",
            record.subfolder(),
            record.folder,
            record.filename
        );

        let outcome = process_row(&record, store, options);
        match &outcome {
            RowOutcome::Downloaded => {}
            RowOutcome::RowError(cause) => tracing::error!("row {row} failed: {cause}"),
            other => tracing::warn!("row {row}: {}", other.status_cell()),
        }

        if outcome.is_found() {
            found += 1;
        } else {
            not_found += 1;
        }
        manifest.write_status(row, &outcome.status_cell())?;

        if options.checkpoint.due(rows_done) {
            let saved = manifest.save()?;
            checkpoint_saves += 1;
            tracing::debug!("checkpoint {} -> {}", checkpoint_saves, saved.path().display());
        }
    }

    let final_save = manifest.save()?;
    Ok(RunSummary {
        total,
        found,
        not_found,
        checkpoint_saves,
        final_save,
    })
}

/// One row's state machine. Never returns an error: every failure mode maps
/// to a terminal [`RowOutcome`].
fn process_row(record: &RowRecord, store: &dyn ObjectStore, options: &RunOptions) -> RowOutcome {
    if record.folder.is_empty() {
        return RowOutcome::FolderEmpty;
    }
    if record.filename.is_empty() {
        return RowOutcome::FilenameEmpty;
    }

    let prefix = folder_prefix(&options.bucket_prefix, &record.folder);
    let lookup = match locate(store, &prefix, &record.filename) {
        Ok(lookup) => lookup,
        Err(e) => return RowOutcome::RowError(e.to_string()),
    };

    match lookup {
        Lookup::FolderNotFound => RowOutcome::FolderNotFound,
        Lookup::ObjectNotFound => RowOutcome::ObjectNotFound,
        Lookup::Found(object) => {
            let target = options
                .base_folder
                .join(record.subfolder())
                .join(record.output_name());
            match download(store, &object, &target) {
                Ok(()) => RowOutcome::Downloaded,
                Err(e) => RowOutcome::DownloadFailed(e.to_string()),
            }
        }
    }
}
