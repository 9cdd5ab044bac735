//! OCI config-file profile loading.
//!
//! The config file is INI-shaped (`~/.oci/config` by convention). Keys absent
//! from the requested profile fall back to the `DEFAULT` section, matching the
//! behavior of Oracle's own SDKs.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::StorageError;

/// Credentials and region for one config-file profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    pub user: String,
    pub tenancy: String,
    pub fingerprint: String,
    pub region: String,
    pub key_file: PathBuf,
}

impl OciProfile {
    /// Load `profile` from the INI file at `path`.
    pub fn load(path: &Path, profile: &str) -> Result<Self, StorageError> {
        if !path.is_file() {
            return Err(StorageError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let conf = Ini::load_from_file(path).map_err(|source| StorageError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let get = |key: &str| -> Result<String, StorageError> {
            lookup(&conf, profile, key)
                .map(str::to_owned)
                .ok_or_else(|| StorageError::MissingKey {
                    profile: profile.to_string(),
                    key: key.to_string(),
                    path: path.to_path_buf(),
                })
        };

        Ok(Self {
            user: get("user")?,
            tenancy: get("tenancy")?,
            fingerprint: get("fingerprint")?,
            region: get("region")?,
            key_file: expand_home(&get("key_file")?),
        })
    }
}

fn lookup<'a>(conf: &'a Ini, profile: &str, key: &str) -> Option<&'a str> {
    conf.section(Some(profile))
        .and_then(|s| s.get(key))
        .or_else(|| conf.section(Some("DEFAULT")).and_then(|s| s.get(key)))
}

/// Expand a leading `~` to the user's home directory. Paths without a tilde
/// (or when no home directory can be determined) pass through unchanged.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
