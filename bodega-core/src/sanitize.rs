//! Filesystem-safe normalization of free-text spreadsheet cell values.

/// Characters that are invalid in Windows file names (and awkward everywhere
/// else). Each occurrence is replaced with `_`.
const INVALID: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Normalize a raw cell value into a string safe to use as a path component.
///
/// Trims surrounding whitespace and replaces every invalid character with an
/// underscore. An empty or whitespace-only input maps to an empty string; the
/// caller decides the fallback.
pub fn sanitize_component(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if INVALID.contains(&c) { '_' } else { c })
        .collect()
}
