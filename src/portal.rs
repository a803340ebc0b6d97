//! Portal composition root.
//!
//! Construct-on-startup wiring of the store and every service over it.
//! There are no hidden singletons; collaborators receive the store and the
//! audit trail explicitly, and the embedding application passes the `Portal`
//! (or individual services) down to its UI layer.

use crate::accounts::AccountDirectory;
use crate::catalog::{CategoryManager, Document, DocumentDraft, DocumentRegistry};
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::provider::ProviderFactory;
use crate::responder::Responder;
use crate::store::PortalStore;
use crate::telemetry::{ActivityRecorder, AuditTrail};

pub struct Portal {
    store: PortalStore,
    pub categories: CategoryManager,
    pub documents: DocumentRegistry,
    pub accounts: AccountDirectory,
    pub activity: ActivityRecorder,
    pub audit: AuditTrail,
    pub responder: Responder,
}

impl Portal {
    /// Open the store at the configured path and wire every service.
    pub fn open(config: &PortalConfig) -> Result<Self, PortalError> {
        let store = PortalStore::open(&config.storage.data_path)?;
        Self::with_store(store, config)
    }

    /// Wire services over an already-open store (tests use this with a
    /// temporary directory).
    pub fn with_store(store: PortalStore, config: &PortalConfig) -> Result<Self, PortalError> {
        let audit = AuditTrail::new(store.clone());
        let categories = CategoryManager::new(store.clone(), audit.clone());
        let documents = DocumentRegistry::new(store.clone(), audit.clone());
        let accounts = AccountDirectory::new(store.clone(), audit.clone());
        let activity = ActivityRecorder::new(store.clone());

        let providers = ProviderFactory::create_all(&config.providers)?;
        let responder = Responder::new(
            providers,
            documents.clone(),
            audit.clone(),
            config.assistant.persona.clone(),
        );

        Ok(Self {
            store,
            categories,
            documents,
            accounts,
            activity,
            audit,
            responder,
        })
    }

    /// Publish a document under a breadcrumb category path.
    ///
    /// The path is resolved (creating missing segments) before anything is
    /// written; an unresolvable path aborts with no partial effect, so no
    /// document is ever left pointing at an empty category.
    pub fn publish_document(
        &self,
        category_path: &str,
        draft: DocumentDraft,
    ) -> Result<Document, PortalError> {
        let category_id = self.categories.ensure_path(category_path)?;
        Ok(self.documents.publish(&category_id, draft))
    }

    /// Count a confirmed download: bumps the document's counter and appends
    /// a visitor activity entry. Unknown ids are a silent no-op.
    pub fn confirm_download(&self, document_id: &str, email: Option<&str>) {
        let Some(document) = self.documents.find(document_id) else {
            return;
        };
        self.documents.record_download(document_id);
        self.activity.record_download(email, &document.title);
    }

    /// Flush pending writes; call on shutdown.
    pub fn flush(&self) -> Result<(), PortalError> {
        self.store.flush()?;
        Ok(())
    }
}
