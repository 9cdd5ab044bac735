//! Fetch a resolved object and write it to the local tree.

use std::path::Path;

use bodega_core::ObjectName;

use crate::client::ObjectStore;
use crate::error::DownloadError;

/// Download `object` in full and write it to `target`, creating parent
/// directories as needed. An existing file at `target` is overwritten.
pub fn download(
    store: &dyn ObjectStore,
    object: &ObjectName,
    target: &Path,
) -> Result<(), DownloadError> {
    let bytes = store.get_object(object.as_str())?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(target, &bytes).map_err(|source| DownloadError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    tracing::info!("downloaded '{object}' to {}", target.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::client::ObjectSummary;
    use crate::error::StorageError;

    use super::*;

    struct FixedStore {
        content: Option<Vec<u8>>,
    }

    impl ObjectStore for FixedStore {
        fn list_objects(
            &self,
            _prefix: &str,
            _limit: Option<u32>,
        ) -> Result<Vec<ObjectSummary>, StorageError> {
            Ok(vec![])
        }

        fn get_object(&self, name: &str) -> Result<Vec<u8>, StorageError> {
            self.content.clone().ok_or_else(|| StorageError::Api {
                status: 500,
                url: format!("https://example/{name}"),
                body: "InternalServerError".to_string(),
            })
        }
    }

    #[test]
    fn writes_bytes_and_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = FixedStore {
            content: Some(b"payload".to_vec()),
        };
        let target = tmp.path().join("12_34").join("Annex 1.pdf");
        download(&store, &ObjectName::from("docs/a.pdf"), &target).expect("download");
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.bin");
        std::fs::write(&target, b"old").unwrap();
        let store = FixedStore {
            content: Some(b"new".to_vec()),
        };
        download(&store, &ObjectName::from("docs/a.pdf"), &target).expect("download");
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn fetch_failure_is_reported_as_fetch_not_io() {
        let tmp = TempDir::new().unwrap();
        let store = FixedStore { content: None };
        let err = download(
            &store,
            &ObjectName::from("docs/a.pdf"),
            &tmp.path().join("never.bin"),
        )
        .unwrap_err();
        assert!(matches!(err, DownloadError::Fetch(_)));
        assert!(!tmp.path().join("never.bin").exists());
    }
}
