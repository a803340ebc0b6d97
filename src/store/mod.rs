//! Persistent Store
//!
//! Fail-soft typed persistence for the portal's record collections. Each
//! collection lives under one logical key as a single JSON blob; mutation is
//! always read-whole-collection, change in memory, write-whole-collection.

pub mod persistence;

pub use persistence::PortalStore;

/// Logical collection keys.
///
/// Absence of a key is a valid initial state, not an error.
pub mod keys {
    pub const ACCOUNTS: &str = "accounts";
    pub const CATEGORIES: &str = "categories";
    pub const DOCUMENTS: &str = "documents";
    pub const VISITOR_ACTIVITY: &str = "visitor_activity";
    pub const AUDIT_LOG: &str = "audit_log";
}
