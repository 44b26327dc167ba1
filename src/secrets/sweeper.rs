//! Background purge of logically-expired secrets.
//!
//! The sweeper is a privileged internal process: it enumerates every
//! persisted row regardless of caller scope and deletes those past their
//! expiration. It performs no authorization and swallows per-record
//! failures so a single bad row cannot block cleanup of the rest.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::instrument;

use crate::errors::Result;
use crate::secrets::store::SecretStore;

#[derive(Clone)]
pub struct ExpirySweeper {
    store: Arc<SecretStore>,
}

impl ExpirySweeper {
    pub fn new(store: Arc<SecretStore>) -> Self {
        Self { store }
    }

    /// One sweep: purge everything with `expires <= now`. Returns the
    /// number of rows actually deleted. Idempotent; a second run right
    /// after is a no-op.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<usize> {
        let now = Utc::now();
        let expired = self.store.expired_names(now).await?;

        let mut purged = 0usize;
        for name in &expired {
            match self.store.purge(name).await {
                Ok(true) => purged += 1,
                // Raced with a concurrent remove; already gone is fine.
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(secret_name = %name, error = %err, "Failed to purge expired secret, continuing sweep");
                }
            }
        }

        tracing::info!(candidates = expired.len(), purged, "Expiry sweep completed");
        Ok(purged)
    }

    /// Periodic sweep loop for the serving process. Never returns; run it
    /// on its own tokio task.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = self.run_once().await {
                tracing::warn!(error = %err, "Expiry sweep failed");
            }
        }
    }
}

impl std::fmt::Debug for ExpirySweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirySweeper").finish_non_exhaustive()
    }
}
