use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Trim a context-menu selection down to what should become a keyword.
///
/// Only surrounding line breaks are dropped; inner text is kept verbatim.
/// Returns None for selections with nothing but whitespace.
pub fn selection_to_keyword(selection: &str) -> Option<&str> {
    let trimmed = selection.trim_matches(|c| c == '\n' || c == '\r');
    if trimmed.trim().is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
