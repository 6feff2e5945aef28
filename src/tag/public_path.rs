//! Public path resolution for generated `href`s.

/// Sentinel meaning "let the host decide at runtime".
pub const AUTO: &str = "auto";

/// Root fallback when nothing is configured.
pub const ROOT: &str = "/";

/// Resolve the public path prefix from candidates in priority order.
///
/// The first candidate that is present and not [`AUTO`] wins; if none
/// qualifies the result is [`ROOT`]. The winner is normalized to end
/// with exactly one `/`. An empty string stays empty, which keeps hrefs
/// relative to the document.
///
/// # Example
/// ```ignore
/// resolve(&[None, Some("auto"), Some("/static//")]) // "/static/"
/// resolve(&[None])                                   // "/"
/// ```
pub fn resolve(candidates: &[Option<&str>]) -> String {
    let chosen = candidates
        .iter()
        .flatten()
        .find(|p| **p != AUTO)
        .copied()
        .unwrap_or(ROOT);
    normalize(chosen)
}

/// Ensure a non-empty public path ends with exactly one separator.
pub fn normalize(public_path: &str) -> String {
    if public_path.is_empty() {
        return String::new();
    }
    let trimmed = public_path.trim_end_matches('/');
    format!("{trimmed}/")
}

/// Join a resolved public path and an output file name.
#[inline]
pub fn href_for(public_path: &str, file_name: &str) -> String {
    format!("{public_path}{file_name}")
}
