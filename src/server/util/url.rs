//! Normalization of submitted website URLs.

use reqwest::Url;

/// Parses and normalizes a submitted website URL.
///
/// Only absolute `http`/`https` URLs with a host are accepted. Scheme and host are
/// lowercased by parsing; the fragment is dropped, as is a trailing `/` on non-root
/// paths.
///
/// # Returns
/// - `Ok(String)` - Normalized URL
/// - `Err(String)` - Human-readable reason the URL was rejected
pub fn normalize_url(input: &str) -> Result<String, String> {
    let mut url = Url::parse(input.trim()).map_err(|e| format!("URL is invalid: {}", e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err("URL must use http or https".to_string());
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("URL must include a host".to_string());
    }

    url.set_fragment(None);

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    Ok(url.to_string())
}
