//! Administrator account directory.
//!
//! Bookkeeping for the portal's admin surface: one master account that always
//! exists and can never be deleted, plus editor accounts with
//! case-insensitively unique usernames. This is UI gating, not an
//! authentication boundary; no credentials are stored here.

use crate::error::PortalError;
use crate::ids::{fresh_id, now};
use crate::store::{keys, PortalStore};
use crate::telemetry::AuditTrail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    Master,
    Editor,
}

/// An administrator account. `last_login == None` means never logged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: String,
    pub username: String,
    pub role: AccountRole,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AccountDirectory {
    store: PortalStore,
    audit: AuditTrail,
}

impl AccountDirectory {
    pub fn new(store: PortalStore, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    pub fn list(&self) -> Vec<AdminAccount> {
        self.store.read_or(keys::ACCOUNTS, Vec::new())
    }

    /// Create the master account if none exists yet. Idempotent.
    pub fn seed_master(&self, username: &str) -> AdminAccount {
        let accounts = self.list();
        if let Some(master) = accounts.iter().find(|a| a.role == AccountRole::Master) {
            return master.clone();
        }

        let master = AdminAccount {
            id: fresh_id("acct"),
            username: username.trim().to_string(),
            role: AccountRole::Master,
            last_login: None,
        };
        let mut accounts = accounts;
        accounts.push(master.clone());
        self.store.write(keys::ACCOUNTS, &accounts);
        master
    }

    /// Add an editor account. Usernames are unique ignoring case.
    pub fn add_editor(&self, username: &str) -> Result<AdminAccount, PortalError> {
        let username = username.trim();
        let mut accounts = self.list();
        if accounts
            .iter()
            .any(|a| a.username.to_lowercase() == username.to_lowercase())
        {
            return Err(PortalError::DuplicateUsername(username.to_string()));
        }

        let account = AdminAccount {
            id: fresh_id("acct"),
            username: username.to_string(),
            role: AccountRole::Editor,
            last_login: None,
        };
        accounts.push(account.clone());
        self.store.write(keys::ACCOUNTS, &accounts);

        self.audit
            .record("account_added", account.username.clone());
        Ok(account)
    }

    /// Delete an account by id. The master account is immutable.
    pub fn delete(&self, id: &str) -> Result<(), PortalError> {
        let mut accounts = self.list();
        let Some(account) = accounts.iter().find(|a| a.id == id) else {
            return Err(PortalError::AccountNotFound(id.to_string()));
        };
        if account.role == AccountRole::Master {
            return Err(PortalError::MasterAccountImmutable);
        }

        let username = account.username.clone();
        accounts.retain(|a| a.id != id);
        self.store.write(keys::ACCOUNTS, &accounts);

        self.audit.record("account_deleted", username);
        Ok(())
    }

    /// Stamp a successful login for the named account.
    pub fn record_login(&self, username: &str) -> Result<AdminAccount, PortalError> {
        let mut accounts = self.list();
        let Some(account) = accounts
            .iter_mut()
            .find(|a| a.username.to_lowercase() == username.to_lowercase())
        else {
            return Err(PortalError::AccountNotFound(username.to_string()));
        };

        account.last_login = Some(now());
        let stamped = account.clone();
        self.store.write(keys::ACCOUNTS, &accounts);
        Ok(stamped)
    }
}
