//! Catalog: the category tree and the document registry.
//!
//! Categories form a forest of parent-pointer nodes; documents are metadata
//! records pointing at externally hosted files, each tied to a live category.
//! Cross-family integrity (document -> category) is maintained here, never by
//! the store.

pub mod categories;
pub mod documents;
pub mod hosting;

pub use categories::{Category, CategoryManager};
pub use documents::{Document, DocumentDraft, DocumentRegistry};
