//! Error types for bodega-storage.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration, signing, or storage calls.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The OCI config file did not exist.
    #[error("OCI config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The OCI config file could not be read or parsed as INI.
    #[error("failed to read OCI config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// A required key was absent from the requested profile (and DEFAULT).
    #[error("profile '{profile}' in {path} is missing required key '{key}'")]
    MissingKey {
        profile: String,
        key: String,
        path: PathBuf,
    },

    /// The private key file could not be read.
    #[error("failed to read private key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The private key was not valid PKCS#8 or PKCS#1 PEM.
    #[error("invalid private key at {path}: {message}")]
    KeyParse { path: PathBuf, message: String },

    /// RSA signing failed.
    #[error("request signing failed: {0}")]
    Sign(String),

    /// The service answered with a non-success HTTP status.
    #[error("service responded {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body could not be read.
    #[error("failed to read response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Download failures, distinct from lookup failures so the orchestrator can
/// report them separately.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Fetching the object's bytes from storage failed.
    #[error("object fetch failed: {0}")]
    Fetch(#[from] StorageError),

    /// Writing the fetched bytes to the local filesystem failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
