//! Shared helpers for integration tests.

use lectern::catalog::DocumentDraft;
use lectern::config::PortalConfig;
use lectern::store::PortalStore;
use lectern::Portal;
use tempfile::TempDir;

/// Build a portal over a throwaway store. Keep the `TempDir` alive for the
/// duration of the test.
pub fn temp_portal() -> (TempDir, Portal) {
    let dir = TempDir::new().unwrap();
    let store = PortalStore::open(dir.path()).unwrap();
    let portal = Portal::with_store(store, &PortalConfig::default()).unwrap();
    (dir, portal)
}

pub fn draft(title: &str) -> DocumentDraft {
    DocumentDraft {
        title: title.to_string(),
        description: format!("{title} description"),
        file_url: "https://example.com/file.pdf".to_string(),
        file_type: "pdf".to_string(),
        tags: vec!["reference".to_string()],
        size: "2.4 MB".to_string(),
    }
}
