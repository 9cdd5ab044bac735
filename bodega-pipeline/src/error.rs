//! Error types for bodega-pipeline.
//!
//! Storage failures never appear here: they are row-scoped and are converted
//! into row outcomes at the row boundary. Only manifest persistence and local
//! setup failures can abort a pass.

use std::path::PathBuf;

use thiserror::Error;

use bodega_manifest::ManifestError;

/// Fatal errors for a manifest pass.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading or persisting the manifest failed beyond recovery.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
