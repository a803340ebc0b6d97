//! Sled-backed implementation of the portal store.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::warn;

/// Key-value persistence wrapper around an embedded sled database.
///
/// Values are whole collections serialized as JSON. The public read/write
/// surface is deliberately fail-soft: a read that hits a missing key, an I/O
/// failure, or bytes that no longer match the expected shape returns the
/// caller's fallback, and a failed write is reported to the diagnostic
/// channel and otherwise swallowed. Callers must not assume durability; a
/// hard storage failure degrades to "treat as empty" rather than propagating.
#[derive(Clone)]
pub struct PortalStore {
    db: sled::Db,
}

impl PortalStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(to_storage_io)?;
        Ok(Self { db })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Read a collection, degrading to `fallback` on any failure.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(err) => {
                warn!(key, error = %err, "store read degraded to fallback");
                fallback
            }
        }
    }

    /// Write a collection. Failures are logged, never surfaced.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_write(key, value) {
            warn!(key, error = %err, "store write failed; change is lost");
        }
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }

    fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.db.get(key.as_bytes()).map_err(to_storage_io)? else {
            return Ok(None);
        };
        let parsed = serde_json::from_slice(&raw).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(parsed))
    }

    fn try_write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_vec(value).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        self.db.insert(key.as_bytes(), raw).map_err(to_storage_io)?;
        Ok(())
    }
}

fn to_storage_io(err: sled::Error) -> StorageError {
    StorageError::Io(io::Error::new(io::ErrorKind::Other, err.to_string()))
}
