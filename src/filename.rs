use std::sync::LazyLock;

use regex::Regex;

/// Path recorded when neither the config nor the host names the file.
pub const UNKNOWN_FILE: &str = "unknown";

static PROJECT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?(?:turbopack/)?(?:\[project\]|%5[Bb]project%5[Dd])/").unwrap()
});

/// Normalize bundler/debugger style filenames before recording them.
pub fn normalize_filename(filename: &str) -> String {
    let mut s = filename.replace('\\', "/");
    if let Some(rest) = s.strip_prefix("file:///") {
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix("file://") {
        s = rest.to_string();
    }
    PROJECT_PREFIX.replace(&s, "").into_owned()
}

/// `path` relative to `root`, or `path` itself when it lies outside `root`.
pub fn relative_to(root: &str, path: &str) -> String {
    let root = normalize_filename(root);
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(root).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Resolve the path recorded in `modules` entries.
pub fn display_path(filename: Option<&str>, project_root: Option<&str>) -> String {
    let Some(filename) = filename else {
        return UNKNOWN_FILE.to_string();
    };
    let normalized = normalize_filename(filename);
    match project_root {
        Some(root) => relative_to(root, &normalized),
        None => normalized,
    }
}
