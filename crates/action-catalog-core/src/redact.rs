//! Download-token redaction.
//!
//! Raw download URLs for non-public content carry a short-lived `token`
//! query parameter. It must not leak into the published catalog.

use crate::model::CatalogEntry;

/// Remove `token=` query parameters from the entry's download URL.
pub fn remove_token(entry: &mut CatalogEntry) {
    if let Some(url) = entry.download_url.as_deref() {
        entry.download_url = Some(strip_token(url));
    }
}

fn strip_token(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("token="))
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    }
}
