//! Helpers for values that end up in span attributes or metadata fields.
//!
//! Span fields only ever carry a file name, never the full path, so logs
//! from a batch over a personnel share can be passed around.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Lower-cased identifier for metadata: letters and digits are kept, runs
/// of anything else collapse to a single `_`.
///
/// `"Главный бухгалтер (ОП)"` → `"главный_бухгалтер_оп"`
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(if c == 'ё' { 'е' } else { c });
        } else {
            pending_separator = true;
        }
    }

    out
}
