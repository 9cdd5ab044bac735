//! Object-storage access for bodega.
//!
//! - [`profile`] — OCI config-file profile loading
//! - [`auth`] — draft-cavage HTTP signature signing
//! - [`client`] — the [`ObjectStore`] seam and the blocking OCI REST client
//! - [`locate`] — three-stage lookup of an expected file against the bucket
//! - [`download`] — fetch resolved objects into the local tree

pub mod auth;
pub mod client;
pub mod download;
pub mod error;
pub mod locate;
pub mod profile;

pub use auth::RequestSigner;
pub use client::{ObjectStore, ObjectSummary, OciClient};
pub use download::download;
pub use error::{DownloadError, StorageError};
pub use locate::{folder_prefix, locate, Lookup};
pub use profile::{expand_home, OciProfile};
