//! Bounded activity streams: the audit trail and visitor activity.
//!
//! Both streams are append-only sliding windows persisted newest-first.
//! The audit trail records administrative actions; visitor activity records
//! visit and download events from the public surface. Oldest entries are
//! dropped once a stream reaches its cap.

use crate::ids::{fresh_id, now};
use crate::store::{keys, PortalStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent visitor activity entries retained.
pub const VISITOR_ACTIVITY_CAP: usize = 500;

/// Most recent audit entries retained.
pub const AUDIT_LOG_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    Visit,
    Download,
}

/// One visit or download event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorActivity {
    pub id: String,
    pub kind: ActivityKind,
    pub email: Option<String>,
    pub file_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One administrative action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Recorder for the visitor activity stream.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: PortalStore,
}

impl ActivityRecorder {
    pub fn new(store: PortalStore) -> Self {
        Self { store }
    }

    pub fn record_visit(&self, email: Option<&str>) {
        self.push(VisitorActivity {
            id: fresh_id("act"),
            kind: ActivityKind::Visit,
            email: email.map(str::to_string),
            file_name: None,
            timestamp: now(),
        });
    }

    pub fn record_download(&self, email: Option<&str>, file_name: &str) {
        self.push(VisitorActivity {
            id: fresh_id("act"),
            kind: ActivityKind::Download,
            email: email.map(str::to_string),
            file_name: Some(file_name.to_string()),
            timestamp: now(),
        });
    }

    /// All retained entries, newest first.
    pub fn recent(&self) -> Vec<VisitorActivity> {
        self.store.read_or(keys::VISITOR_ACTIVITY, Vec::new())
    }

    fn push(&self, entry: VisitorActivity) {
        let mut entries = self.recent();
        entries.insert(0, entry);
        entries.truncate(VISITOR_ACTIVITY_CAP);
        self.store.write(keys::VISITOR_ACTIVITY, &entries);
    }
}

/// Recorder for the audit trail.
#[derive(Clone)]
pub struct AuditTrail {
    store: PortalStore,
}

impl AuditTrail {
    pub fn new(store: PortalStore) -> Self {
        Self { store }
    }

    pub fn record(&self, action: &str, details: impl Into<String>) {
        let mut entries = self.entries();
        entries.insert(
            0,
            AuditEntry {
                id: fresh_id("audit"),
                action: action.to_string(),
                details: details.into(),
                timestamp: now(),
            },
        );
        entries.truncate(AUDIT_LOG_CAP);
        self.store.write(keys::AUDIT_LOG, &entries);
    }

    /// All retained entries, newest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.store.read_or(keys::AUDIT_LOG, Vec::new())
    }

    /// Entries recorded under one action tag, newest first.
    pub fn entries_for(&self, action: &str) -> Vec<AuditEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.action == action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, PortalStore) {
        let dir = TempDir::new().unwrap();
        let store = PortalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn audit_trail_evicts_past_cap_newest_first() {
        let (_dir, store) = store();
        let trail = AuditTrail::new(store);

        for i in 0..110 {
            trail.record("test_action", format!("entry {i}"));
        }

        let entries = trail.entries();
        assert_eq!(entries.len(), AUDIT_LOG_CAP);
        assert_eq!(entries[0].details, "entry 109");
        assert_eq!(entries[99].details, "entry 10");
    }

    #[test]
    fn visitor_activity_evicts_past_cap() {
        let (_dir, store) = store();
        let recorder = ActivityRecorder::new(store);

        for i in 0..(VISITOR_ACTIVITY_CAP + 5) {
            recorder.record_download(Some("v@example.com"), &format!("file-{i}.pdf"));
        }

        let entries = recorder.recent();
        assert_eq!(entries.len(), VISITOR_ACTIVITY_CAP);
        assert_eq!(entries[0].file_name.as_deref(), Some("file-504.pdf"));
    }

    #[test]
    fn visit_entries_have_no_file_name() {
        let (_dir, store) = store();
        let recorder = ActivityRecorder::new(store);

        recorder.record_visit(Some("v@example.com"));
        recorder.record_visit(None);

        let entries = recorder.recent();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == ActivityKind::Visit));
        assert!(entries.iter().all(|e| e.file_name.is_none()));
        assert_eq!(entries[1].email.as_deref(), Some("v@example.com"));
    }

    #[test]
    fn entries_for_filters_by_action() {
        let (_dir, store) = store();
        let trail = AuditTrail::new(store);

        trail.record("category_added", "Math");
        trail.record("document_published", "Syllabus");
        trail.record("category_added", "Physics");

        let added = trail.entries_for("category_added");
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].details, "Physics");
    }
}
