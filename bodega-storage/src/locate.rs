//! Three-stage lookup of an expected file against the bucket.
//!
//! Stage order, each stage only run when the prior one did not resolve:
//! 1. existence probe — one object under the folder prefix, or the folder
//!    does not exist at all;
//! 2. exact-name probe — a short prefix listing, accepted only on an exact
//!    name match (`a.pdf.bak` must never satisfy an expected `a.pdf`);
//! 3. suffix fallback — full listing under the prefix, matching names that
//!    end with the filename; tolerates naming drift such as extra nesting.
//!
//! The fallback picks the lexicographically smallest candidate, so repeated
//! lookups against unchanged storage always resolve the same name.

use bodega_core::ObjectName;

use crate::client::ObjectStore;
use crate::error::StorageError;

/// Result of a lookup that completed without a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The exact stored name to download.
    Found(ObjectName),
    /// Zero objects exist under the folder prefix.
    FolderNotFound,
    /// The folder exists but no object matched the filename.
    ObjectNotFound,
}

/// Join the bucket root prefix and a row's folder into a listing prefix that
/// always ends with `/`. Surrounding slashes on either part are ignored.
pub fn folder_prefix(root: &str, folder: &str) -> String {
    let root = root.trim_matches('/');
    let folder = folder.trim_matches('/');
    let joined = if root.is_empty() {
        folder.to_string()
    } else {
        format!("{root}/{folder}")
    };
    format!("{}/", joined.trim_end_matches('/'))
}

/// Resolve `filename` under `prefix`.
///
/// Storage failures propagate; they are not a `NotFound`. Empty `prefix` or
/// `filename` are a caller error and must be rejected upstream.
pub fn locate(
    store: &dyn ObjectStore,
    prefix: &str,
    filename: &str,
) -> Result<Lookup, StorageError> {
    let prefix = if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    };

    // Stage 1: does the logical folder exist at all?
    if store.list_objects(&prefix, Some(1))?.is_empty() {
        return Ok(Lookup::FolderNotFound);
    }

    // Stage 2: exact name.
    let expected = format!("{prefix}{filename}");
    let exact = store.list_objects(&expected, Some(5))?;
    if exact.iter().any(|o| o.name == expected) {
        return Ok(Lookup::Found(ObjectName::from(expected)));
    }

    // Stage 3: suffix fallback over the whole folder.
    tracing::debug!("no exact match for '{expected}', trying suffix fallback");
    let all = store.list_objects(&prefix, None)?;
    let nested_suffix = format!("/{filename}");
    let candidate = all
        .iter()
        .map(|o| o.name.as_str())
        .filter(|name| name.ends_with(&nested_suffix) || name.ends_with(filename))
        .min();

    Ok(match candidate {
        Some(name) => Lookup::Found(ObjectName::from(name)),
        None => Lookup::ObjectNotFound,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::client::ObjectSummary;

    use super::*;

    /// In-memory store that records every listing call.
    struct MockStore {
        objects: Vec<String>,
        list_calls: RefCell<Vec<(String, Option<u32>)>>,
    }

    impl MockStore {
        fn with_objects(objects: &[&str]) -> Self {
            Self {
                objects: objects.iter().map(|s| s.to_string()).collect(),
                list_calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.list_calls.borrow().len()
        }
    }

    impl ObjectStore for MockStore {
        fn list_objects(
            &self,
            prefix: &str,
            limit: Option<u32>,
        ) -> Result<Vec<ObjectSummary>, StorageError> {
            self.list_calls
                .borrow_mut()
                .push((prefix.to_string(), limit));
            let mut names: Vec<ObjectSummary> = self
                .objects
                .iter()
                .filter(|name| name.starts_with(prefix))
                .map(|name| ObjectSummary { name: name.clone() })
                .collect();
            if let Some(limit) = limit {
                names.truncate(limit as usize);
            }
            Ok(names)
        }

        fn get_object(&self, _name: &str) -> Result<Vec<u8>, StorageError> {
            Ok(b"bytes".to_vec())
        }
    }

    #[test]
    fn folder_prefix_joins_and_normalizes() {
        assert_eq!(folder_prefix("pqrsdf", "exp1"), "pqrsdf/exp1/");
        assert_eq!(folder_prefix("/pqrsdf/", "/exp1/"), "pqrsdf/exp1/");
        assert_eq!(folder_prefix("", "exp1"), "exp1/");
    }

    #[test]
    fn empty_folder_short_circuits_to_folder_not_found() {
        let store = MockStore::with_objects(&[]);
        let result = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(result, Lookup::FolderNotFound);
        // Only the existence probe ran; exact and suffix stages were skipped.
        assert_eq!(store.call_count(), 1);
        assert_eq!(store.list_calls.borrow()[0], ("docs/".to_string(), Some(1)));
    }

    #[test]
    fn exact_match_resolves_at_stage_two() {
        let store = MockStore::with_objects(&["docs/a.pdf", "docs/z.txt"]);
        let result = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(result, Lookup::Found(ObjectName::from("docs/a.pdf")));
        assert_eq!(store.call_count(), 2);
    }

    #[test]
    fn longer_name_sharing_the_prefix_is_not_an_exact_match() {
        // Expected a.pdf; only a.pdf.bak is stored. Stage 2 must reject it and
        // stage 3 must not suffix-match it either.
        let store = MockStore::with_objects(&["docs/a.pdf.bak"]);
        let result = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(result, Lookup::ObjectNotFound);
    }

    #[test]
    fn suffix_fallback_finds_nested_object() {
        let store = MockStore::with_objects(&["docs/sub/dir/a.pdf", "docs/other.txt"]);
        let result = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(result, Lookup::Found(ObjectName::from("docs/sub/dir/a.pdf")));
        assert_eq!(store.call_count(), 3);
    }

    #[test]
    fn suffix_fallback_is_deterministic_across_candidates() {
        let store = MockStore::with_objects(&["docs/z/a.pdf", "docs/b/a.pdf", "docs/m/a.pdf"]);
        let result = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(result, Lookup::Found(ObjectName::from("docs/b/a.pdf")));
    }

    #[test]
    fn repeated_lookup_on_unchanged_storage_resolves_identically() {
        let store = MockStore::with_objects(&["docs/x/a.pdf", "docs/y/a.pdf"]);
        let first = locate(&store, "docs/", "a.pdf").unwrap();
        let second = locate(&store, "docs/", "a.pdf").unwrap();
        assert_eq!(first, second);

        let empty = MockStore::with_objects(&["docs/unrelated.txt"]);
        assert_eq!(
            locate(&empty, "docs/", "a.pdf").unwrap(),
            locate(&empty, "docs/", "a.pdf").unwrap()
        );
    }

    #[test]
    fn prefix_without_trailing_slash_is_normalized() {
        let store = MockStore::with_objects(&["docs/a.pdf"]);
        let result = locate(&store, "docs", "a.pdf").unwrap();
        assert_eq!(result, Lookup::Found(ObjectName::from("docs/a.pdf")));
    }
}
