//! Document registry: metadata records for externally hosted files.

use crate::catalog::hosting::normalize_share_url;
use crate::ids::{fresh_id, now};
use crate::store::{keys, PortalStore};
use crate::telemetry::AuditTrail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metadata for one externally hosted document. No file bytes ever pass
/// through the portal; `file_url` points at the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub file_url: String,
    pub file_type: String,
    pub tags: Vec<String>,
    pub size: String,
    pub downloads: u64,
    pub date_added: DateTime<Utc>,
}

/// Caller-supplied fields for a new document. The category is passed
/// separately at publish time; resolve it with
/// `CategoryManager::ensure_path` first.
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub tags: Vec<String>,
    pub size: String,
}

/// CRUD over the stored document collection, newest first.
#[derive(Clone)]
pub struct DocumentRegistry {
    store: PortalStore,
    audit: AuditTrail,
}

impl DocumentRegistry {
    pub fn new(store: PortalStore, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    /// All documents, newest first.
    pub fn list(&self) -> Vec<Document> {
        self.store.read_or(keys::DOCUMENTS, Vec::new())
    }

    pub fn find(&self, id: &str) -> Option<Document> {
        self.list().into_iter().find(|d| d.id == id)
    }

    /// Publish a document under a live category: normalize its hosting URL,
    /// stamp id/time, prepend.
    pub fn publish(&self, category_id: &str, draft: DocumentDraft) -> Document {
        let document = Document {
            id: fresh_id("doc"),
            title: draft.title,
            description: draft.description,
            category_id: category_id.to_string(),
            file_url: normalize_share_url(&draft.file_url),
            file_type: draft.file_type,
            tags: draft.tags,
            size: draft.size,
            downloads: 0,
            date_added: now(),
        };

        let mut documents = self.list();
        documents.insert(0, document.clone());
        self.store.write(keys::DOCUMENTS, &documents);

        self.audit
            .record("document_published", document.title.clone());
        document
    }

    /// Remove a document. Returns false when the id is unknown.
    pub fn delete(&self, id: &str) -> bool {
        let mut documents = self.list();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return false;
        }
        self.store.write(keys::DOCUMENTS, &documents);
        self.audit.record("document_deleted", id.to_string());
        true
    }

    /// Count one confirmed download. Unknown ids are a silent no-op.
    pub fn record_download(&self, id: &str) {
        let mut documents = self.list();
        let Some(document) = documents.iter_mut().find(|d| d.id == id) else {
            debug!(id, "download recorded for unknown document; ignoring");
            return;
        };
        document.downloads += 1;
        self.store.write(keys::DOCUMENTS, &documents);
    }

    /// Case-insensitive search over title, description, and tags.
    pub fn search(&self, query: &str) -> Vec<Document> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list();
        }
        self.list()
            .into_iter()
            .filter(|d| {
                d.title.to_lowercase().contains(&needle)
                    || d.description.to_lowercase().contains(&needle)
                    || d.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Titles of every registered document, newest first. Feeds the
    /// assistant's system prompt.
    pub fn titles(&self) -> Vec<String> {
        self.list().into_iter().map(|d| d.title).collect()
    }
}
