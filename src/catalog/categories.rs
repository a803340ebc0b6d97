//! Category tree management: creation, breadcrumb path resolution, and
//! cascading deletion.

use crate::catalog::documents::Document;
use crate::error::PortalError;
use crate::ids::fresh_id;
use crate::store::{keys, PortalStore};
use crate::telemetry::AuditTrail;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Delimiter for human-typed breadcrumb paths ("Math > Algebra > Exercises").
const PATH_DELIMITER: char = '>';

/// A node in the document hierarchy. `parent_id == None` marks a root; the
/// collection forms a forest. No cycles by construction: a category is only
/// created under an already-existing parent and parents are never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

/// CRUD over the stored category forest.
#[derive(Clone)]
pub struct CategoryManager {
    store: PortalStore,
    audit: AuditTrail,
}

impl CategoryManager {
    pub fn new(store: PortalStore, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    /// All categories, in creation order.
    pub fn list(&self) -> Vec<Category> {
        self.store.read_or(keys::CATEGORIES, Vec::new())
    }

    pub fn find(&self, id: &str) -> Option<Category> {
        self.list().into_iter().find(|c| c.id == id)
    }

    /// Create a category under `parent_id` (or at the root).
    ///
    /// Parent existence is the caller's responsibility; `ensure_path` is the
    /// safe way to build hierarchies.
    pub fn add(&self, name: &str, parent_id: Option<&str>) -> Category {
        let category = Category {
            id: fresh_id("cat"),
            name: name.trim().to_string(),
            parent_id: parent_id.map(str::to_string),
        };

        let mut categories = self.list();
        categories.push(category.clone());
        self.store.write(keys::CATEGORIES, &categories);

        self.audit
            .record("category_added", category.name.clone());
        category
    }

    /// Resolve a breadcrumb path to a leaf category id, creating any missing
    /// segments along the way.
    ///
    /// Segments are trimmed and matched case-insensitively against existing
    /// children of the current parent, so repeated publication under
    /// "Math > Algebra > Exercises" never duplicates intermediate nodes.
    /// A path with no non-empty segments is an unresolved-category error and
    /// must abort the dependent operation.
    pub fn ensure_path(&self, path: &str) -> Result<String, PortalError> {
        let segments: Vec<&str> = path
            .split(PATH_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(PortalError::UnresolvedCategoryPath);
        }

        let mut parent_id: Option<String> = None;
        for segment in segments {
            let wanted = segment.to_lowercase();
            let existing = self.list().into_iter().find(|c| {
                c.parent_id.as_deref() == parent_id.as_deref()
                    && c.name.to_lowercase() == wanted
            });

            let id = match existing {
                Some(category) => category.id,
                None => self.add(segment, parent_id.as_deref()).id,
            };
            parent_id = Some(id);
        }

        // Non-empty segment list guarantees at least one iteration.
        parent_id.ok_or(PortalError::UnresolvedCategoryPath)
    }

    /// Delete a category and everything beneath it.
    ///
    /// The descendant closure is computed by fixed-point expansion over the
    /// flat list, which handles arbitrarily deep trees without recursion and
    /// tolerates the forest being unordered. Documents referencing any
    /// deleted category are removed in the same pass.
    pub fn delete(&self, id: &str) {
        let categories = self.list();

        let mut doomed: HashSet<String> = HashSet::new();
        doomed.insert(id.to_string());
        loop {
            let before = doomed.len();
            for category in &categories {
                if let Some(parent) = &category.parent_id {
                    if doomed.contains(parent) {
                        doomed.insert(category.id.clone());
                    }
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let remaining: Vec<Category> = categories
            .into_iter()
            .filter(|c| !doomed.contains(&c.id))
            .collect();
        let removed = doomed.len();

        let documents: Vec<Document> = self.store.read_or(keys::DOCUMENTS, Vec::new());
        let kept_documents: Vec<Document> = documents
            .into_iter()
            .filter(|d| !doomed.contains(&d.category_id))
            .collect();

        self.store.write(keys::CATEGORIES, &remaining);
        self.store.write(keys::DOCUMENTS, &kept_documents);

        debug!(removed, "category subtree deleted");
        self.audit
            .record("category_deleted", format!("{removed} categories removed"));
    }
}
