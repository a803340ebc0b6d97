//! Lectern: Local-First Document Portal Core
//!
//! A document portal core built on an embedded key-value store: a
//! hierarchical category tree, a registry of externally hosted documents,
//! bounded visit/download telemetry, an administrator account directory, and
//! an assistant that races each chat query across every configured AI
//! provider and answers with the first success.

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod portal;
pub mod provider;
pub mod responder;
pub mod store;
pub mod telemetry;

pub use portal::Portal;
