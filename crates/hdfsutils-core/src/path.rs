//! Helpers for slash-separated remote paths.
//!
//! Remote paths are plain strings, never `std::path::Path`: they follow HDFS
//! rules regardless of the host platform.

/// Normalize a path (remove trailing slashes, collapse `//`, force a leading `/`).
pub fn normalize(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        result.push('/');
        result.push_str(segment);
    }
    if result.is_empty() {
        result.push('/');
    }
    result
}

/// Join a child name onto a parent directory path.
pub fn join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    format!("{parent}/{name}")
}

/// Final component of a path; empty for the root.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Parent directory of a path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&trimmed[..idx]),
        None => None,
    }
}
