//! Image/logo URL normalization.

use url::Url;

/// Rewrites a GitHub "blob" viewer link to its raw-content equivalent.
///
/// `https://github.com/<owner>/<repo>/blob/<rest>` becomes
/// `https://raw.githubusercontent.com/<owner>/<repo>/<rest>`. Any other URL
/// passes through unchanged; empty or absent input yields `None`.
pub fn normalize_image_url(input: Option<String>) -> Option<String> {
    let raw = input.filter(|s| !s.is_empty())?;

    let Ok(parsed) = Url::parse(&raw) else {
        return Some(raw);
    };
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str() != Some("github.com") {
        return Some(raw);
    }

    let segments: Vec<&str> = match parsed.path_segments() {
        Some(s) => s.collect(),
        None => return Some(raw),
    };
    match segments.as_slice() {
        [owner, repo, "blob", rest @ ..] if rest.iter().any(|s| !s.is_empty()) => Some(format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{}",
            rest.join("/")
        )),
        _ => Some(raw),
    }
}
