//! Hosting share-link normalization.
//!
//! Documents are published by pasting a share URL from the external hosting
//! platform. Google Drive share links come in two shapes, both carrying a
//! file id:
//!
//!   https://drive.google.com/file/d/<ID>/view?usp=sharing
//!   https://drive.google.com/open?id=<ID>
//!
//! Both are rewritten to the direct-download form; anything else passes
//! through unchanged so arbitrary external links keep working.

const HOSTING_DOMAIN: &str = "drive.google.com";
const FILE_PATH_MARKER: &str = "/file/d/";
const ID_QUERY_MARKER: &str = "id=";

/// Rewrite a hosting share URL to its direct-download form.
///
/// URLs that do not match the hosting domain or either accepted shape are
/// returned unchanged.
pub fn normalize_share_url(url: &str) -> String {
    if !url.contains(HOSTING_DOMAIN) {
        return url.to_string();
    }

    if let Some(id) = extract_path_id(url).or_else(|| extract_query_id(url)) {
        return format!("https://{HOSTING_DOMAIN}/uc?export=download&id={id}");
    }

    url.to_string()
}

/// Shape one: `/file/d/<ID>/...` with the id running to the next `/`, `?`, or end.
fn extract_path_id(url: &str) -> Option<&str> {
    let start = url.find(FILE_PATH_MARKER)? + FILE_PATH_MARKER.len();
    let rest = &url[start..];
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

/// Shape two: `?id=<ID>` with the id running to the next `&` or end.
fn extract_query_id(url: &str) -> Option<&str> {
    let query = url.split_once('?').map(|(_, q)| q)?;
    for pair in query.split('&') {
        if let Some(id) = pair.strip_prefix(ID_QUERY_MARKER) {
            if !id.is_empty() {
                return Some(id);
            }
        }
    }
    None
}
