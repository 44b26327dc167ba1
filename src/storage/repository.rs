//! Key-value repository for persisted secret envelopes.
//!
//! The store is written against the [`SecretRepository`] trait so tests and
//! alternative backends can inject their own implementation; the shipped
//! backend is SQLite via sqlx. The repository knows nothing about envelope
//! contents - the codec is the only component that interprets them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// Persisted row for one secret
#[derive(Debug, Clone, FromRow)]
pub struct SecretRecord {
    pub name: String,
    pub envelope: String,
    pub expires_at: DateTime<Utc>,
}

/// Storage contract required by the secret store: single-key atomic
/// put/get/delete plus enumeration for list and sweep.
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Unconditional atomic upsert: creates the row or fully replaces it.
    async fn put(&self, name: &str, envelope: &str, expires_at: DateTime<Utc>) -> Result<()>;

    /// Fetch a row regardless of its expiry state.
    async fn get(&self, name: &str) -> Result<Option<SecretRecord>>;

    /// Delete a row. Returns whether a row existed.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Every persisted name with its expiration, regardless of expiry
    /// state, ordered by name.
    async fn list(&self) -> Result<Vec<(String, DateTime<Utc>)>>;

    /// Names of rows with `expires_at <= now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>>;
}

/// sqlx-backed repository over the `secrets` table
#[derive(Clone)]
pub struct SqlxSecretRepository {
    pool: DbPool,
}

impl SqlxSecretRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SecretRepository for SqlxSecretRepository {
    #[instrument(skip(self, envelope), fields(secret_name = %name), name = "db_put_secret")]
    async fn put(&self, name: &str, envelope: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO secrets (name, envelope, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) \
             ON CONFLICT(name) DO UPDATE SET \
                 envelope = excluded.envelope, \
                 expires_at = excluded.expires_at, \
                 updated_at = excluded.updated_at",
        )
        .bind(name)
        .bind(envelope)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, secret_name = %name, "Failed to write secret");
            Error::Database { source: e, context: format!("Failed to write secret '{}'", name) }
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(secret_name = %name), name = "db_get_secret")]
    async fn get(&self, name: &str) -> Result<Option<SecretRecord>> {
        sqlx::query_as::<sqlx::Sqlite, SecretRecord>(
            "SELECT name, envelope, expires_at FROM secrets WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, secret_name = %name, "Failed to read secret");
            Error::Database { source: e, context: format!("Failed to read secret '{}'", name) }
        })
    }

    #[instrument(skip(self), fields(secret_name = %name), name = "db_delete_secret")]
    async fn delete(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM secrets WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, secret_name = %name, "Failed to delete secret");
                Error::Database {
                    source: e,
                    context: format!("Failed to delete secret '{}'", name),
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), name = "db_list_secrets")]
    async fn list(&self) -> Result<Vec<(String, DateTime<Utc>)>> {
        let rows = sqlx::query_as::<sqlx::Sqlite, SecretRecord>(
            "SELECT name, envelope, expires_at FROM secrets ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list secrets");
            Error::Database { source: e, context: "Failed to list secrets".to_string() }
        })?;

        Ok(rows.into_iter().map(|row| (row.name, row.expires_at)).collect())
    }

    #[instrument(skip(self), name = "db_list_expired_secrets")]
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<sqlx::Sqlite, SecretRecord>(
            "SELECT name, envelope, expires_at FROM secrets WHERE expires_at <= $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list expired secrets");
            Error::Database { source: e, context: "Failed to list expired secrets".to_string() }
        })?;

        Ok(rows.into_iter().map(|row| row.name).collect())
    }
}

impl std::fmt::Debug for SqlxSecretRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxSecretRepository").field("pool", &"[DbPool]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::memory_repository;
    use chrono::Duration;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let repo = memory_repository().await;
        let expires = Utc::now() + Duration::days(1);

        repo.put("captain:foo", r#"{"secret":{"data":"bar"}}"#, expires).await.unwrap();

        let record = repo.get("captain:foo").await.unwrap().unwrap();
        assert_eq!(record.name, "captain:foo");
        assert_eq!(record.envelope, r#"{"secret":{"data":"bar"}}"#);

        assert!(repo.delete("captain:foo").await.unwrap());
        assert!(repo.get("captain:foo").await.unwrap().is_none());
        assert!(!repo.delete("captain:foo").await.unwrap());
    }

    #[tokio::test]
    async fn put_replaces_existing_row() {
        let repo = memory_repository().await;
        let first = Utc::now() + Duration::hours(1);
        let second = Utc::now() + Duration::hours(2);

        repo.put("captain:foo", "v1", first).await.unwrap();
        repo.put("captain:foo", "v2", second).await.unwrap();

        let record = repo.get("captain:foo").await.unwrap().unwrap();
        assert_eq!(record.envelope, "v2");
        assert!(record.expires_at > first);

        // Still a single row.
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_expired_selects_by_timestamp() {
        let repo = memory_repository().await;
        let now = Utc::now();

        repo.put("live", "e", now + Duration::hours(2)).await.unwrap();
        repo.put("stale", "e", now - Duration::hours(2)).await.unwrap();
        repo.put("boundary", "e", now).await.unwrap();

        let mut expired = repo.list_expired(now).await.unwrap();
        expired.sort();
        assert_eq!(expired, vec!["boundary".to_string(), "stale".to_string()]);

        assert_eq!(repo.list().await.unwrap().len(), 3);
    }
}
