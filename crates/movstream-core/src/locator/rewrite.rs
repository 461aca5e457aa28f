//! Rewrites source-hosting page URLs into their raw-content equivalents.

use url::Url;

/// Rewrites a hosting "blob" page URL into the URL of the raw file.
///
/// - `https://github.com/<u>/<r>/blob/<ref>/<path>` -> `https://raw.githubusercontent.com/<u>/<r>/<ref>/<path>`
/// - `https://gitlab.com/<ns>/<p>/-/blob/<ref>/<path>` -> `https://gitlab.com/<ns>/<p>/-/raw/<ref>/<path>`
///
/// Anything else (including already-raw URLs and unparseable input) is returned unchanged.
pub fn rewrite_hosting_page(locator: &str) -> String {
    let Ok(mut url) = Url::parse(locator) else {
        return locator.to_string();
    };
    let host = url.host_str().map(|h| h.to_ascii_lowercase());
    let segments: Vec<String> = match url.path_segments() {
        Some(s) => s.map(str::to_string).collect(),
        None => return locator.to_string(),
    };

    let rewritten = match host.as_deref() {
        Some("github.com") | Some("www.github.com") => github_raw_path(&segments)
            .map(|path| ("raw.githubusercontent.com", path)),
        Some("gitlab.com") | Some("www.gitlab.com") => {
            gitlab_raw_path(&segments).map(|path| ("gitlab.com", path))
        }
        _ => None,
    };

    let Some((raw_host, path)) = rewritten else {
        return locator.to_string();
    };
    if url.set_host(Some(raw_host)).is_err() {
        return locator.to_string();
    }
    url.set_path(&path);
    tracing::debug!("rewrote hosting page {} -> {}", locator, url);
    url.to_string()
}

/// `<u>/<r>/blob/<ref>/<path..>` -> `/<u>/<r>/<ref>/<path..>`
fn github_raw_path(segments: &[String]) -> Option<String> {
    if segments.len() < 5 || segments[2] != "blob" {
        return None;
    }
    let mut out = vec![segments[0].as_str(), segments[1].as_str()];
    out.extend(segments[3..].iter().map(String::as_str));
    Some(format!("/{}", out.join("/")))
}

/// `<ns..>/-/blob/<ref>/<path..>` -> `/<ns..>/-/raw/<ref>/<path..>`
fn gitlab_raw_path(segments: &[String]) -> Option<String> {
    let dash = segments.iter().position(|s| s == "-")?;
    if dash < 2 || segments.len() < dash + 4 || segments[dash + 1] != "blob" {
        return None;
    }
    let mut out: Vec<&str> = segments.iter().map(String::as_str).collect();
    out[dash + 1] = "raw";
    Some(format!("/{}", out.join("/")))
}
