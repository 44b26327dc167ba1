//! Programmatic schema migrations for the secrets table.
//!
//! Kept as in-code SQL rather than external migration files so tests can
//! bring up an in-memory database with the production schema.

use sqlx::Row;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// One schema migration step
struct Migration {
    version: i64,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create secrets table",
    sql: "CREATE TABLE IF NOT EXISTS secrets (
              name TEXT PRIMARY KEY NOT NULL,
              envelope TEXT NOT NULL,
              expires_at TEXT NOT NULL,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
          );
          CREATE INDEX IF NOT EXISTS idx_secrets_expires_at ON secrets (expires_at);",
}];

/// Run all pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
             version INTEGER PRIMARY KEY,
             description TEXT NOT NULL,
             applied_at TEXT NOT NULL DEFAULT (datetime('now'))
         )",
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Database {
        source: e,
        context: "Failed to create schema_migrations table".to_string(),
    })?;

    let applied = current_version(pool).await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        for statement in migration.sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(pool).await.map_err(|e| Error::Database {
                source: e,
                context: format!(
                    "Migration {} ({}) failed",
                    migration.version, migration.description
                ),
            })?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(pool)
            .await
            .map_err(|e| Error::Database {
                source: e,
                context: format!("Failed to record migration {}", migration.version),
            })?;

        tracing::info!(
            version = migration.version,
            description = migration.description,
            "Applied database migration"
        );
    }

    Ok(())
}

/// Highest applied migration version, 0 when none
pub async fn current_version(pool: &DbPool) -> Result<i64> {
    let row = sqlx::query("SELECT COALESCE(MAX(version), 0) AS version FROM schema_migrations")
        .fetch_one(pool)
        .await
        .map_err(|e| Error::Database {
            source: e,
            context: "Failed to read schema version".to_string(),
        })?;

    Ok(row.get::<i64, _>("version"))
}
