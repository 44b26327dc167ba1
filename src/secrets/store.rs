//! Secret store: lifecycle semantics over the injected repository.
//!
//! The store owns the persisted representation exclusively; callers hold
//! only names. It enforces the read-time expiry rule (an expired row is
//! indistinguishable from an absent one to `get`) and the deliberate
//! asymmetry that `remove` still sees expired-but-unpurged rows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::secrets::codec::{self, Envelope};
use crate::storage::SecretRepository;

/// Message for a name with no physical row.
pub const NOT_FOUND_MESSAGE: &str = "Secret not found";

/// Message for a physically present row past its expiration.
pub const EXPIRED_MESSAGE: &str = "The requested resource has expired.";

/// A secret as returned to authorized readers.
#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    pub payload: Value,
    pub expires: DateTime<Utc>,
}

/// CRUD + list over secret entities, built on a key-value repository.
#[derive(Clone)]
pub struct SecretStore {
    repository: Arc<dyn SecretRepository>,
}

impl SecretStore {
    pub fn new(repository: Arc<dyn SecretRepository>) -> Self {
        Self { repository }
    }

    /// Read a secret. Absent rows and expired rows are both unreadable,
    /// but report differently: `NotFound` vs `Expired`.
    #[instrument(skip(self), fields(secret_name = %name))]
    pub async fn get(&self, name: &str) -> Result<Secret> {
        let record = match self.repository.get(name).await? {
            Some(record) => record,
            None => return Err(Error::not_found(NOT_FOUND_MESSAGE)),
        };

        if record.expires_at <= Utc::now() {
            return Err(Error::expired(EXPIRED_MESSAGE));
        }

        let Envelope { payload, expires } = decode_logged(name, &record.envelope)?;
        Ok(Secret { payload, expires })
    }

    /// Unconditional upsert: creates if absent, fully replaces if present.
    /// Past expirations are accepted as given; writing an already-expired
    /// row is how administrative and lifecycle tests seed state.
    #[instrument(skip(self, payload), fields(secret_name = %name, expires = %expires))]
    pub async fn set(&self, name: &str, payload: &Value, expires: DateTime<Utc>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::validation("secret name must not be empty"));
        }

        let envelope = codec::encode(payload, expires);
        self.repository.put(name, &envelope, expires).await?;

        tracing::info!(secret_name = %name, expires = %expires, "Stored secret");
        Ok(())
    }

    /// Delete a row. Expired-but-unpurged rows count as existing here:
    /// removal is an administrative action, not a read.
    #[instrument(skip(self), fields(secret_name = %name))]
    pub async fn remove(&self, name: &str) -> Result<()> {
        if !self.repository.delete(name).await? {
            return Err(Error::not_found(NOT_FOUND_MESSAGE));
        }

        tracing::info!(secret_name = %name, "Deleted secret");
        Ok(())
    }

    /// Every name whose row is still live at `now`, ordered by name.
    pub async fn list_live(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let names = self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(name, _)| name)
            .collect();

        Ok(names)
    }

    /// Names of rows past expiration at `now`. Privileged, sweeper-only.
    pub async fn expired_names(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        self.repository.list_expired(now).await
    }

    /// Best-effort purge for the sweeper: deleting an already-gone row is
    /// a no-op, not an error.
    pub async fn purge(&self, name: &str) -> Result<bool> {
        self.repository.delete(name).await
    }
}

fn decode_logged(name: &str, envelope: &str) -> Result<Envelope> {
    codec::decode(envelope).map_err(|e| {
        // Data written through encode always decodes; reaching this branch
        // means storage-layer corruption or tampering.
        tracing::error!(secret_name = %name, error = %e, "Stored envelope failed to decode");
        e
    })
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore").finish_non_exhaustive()
    }
}
