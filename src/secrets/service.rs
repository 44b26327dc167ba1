//! Authorization gate wrapping every secret store entry point.
//!
//! The ordering here is a hard invariant: the required scope is evaluated
//! BEFORE any store access, so a caller without the scope gets
//! `Unauthorized` whether or not the name exists. Error codes must never
//! leak existence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::instrument;

use crate::auth::scope::{required_scope, SecretAction, LIST_SCOPE};
use crate::auth::AuthContext;
use crate::errors::{Error, Result};
use crate::secrets::store::{Secret, SecretStore};

/// Scope-gated facade over the [`SecretStore`].
#[derive(Debug, Clone)]
pub struct SecretService {
    store: Arc<SecretStore>,
}

impl SecretService {
    pub fn new(store: Arc<SecretStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, context), fields(client_id = %context.client_id, secret_name = %name))]
    pub async fn get(&self, context: &AuthContext, name: &str) -> Result<Secret> {
        self.authorize(context, SecretAction::Get, name)?;
        self.store.get(name).await
    }

    #[instrument(skip(self, context, payload), fields(client_id = %context.client_id, secret_name = %name))]
    pub async fn set(
        &self,
        context: &AuthContext,
        name: &str,
        payload: &Value,
        expires: DateTime<Utc>,
    ) -> Result<()> {
        self.authorize(context, SecretAction::Set, name)?;
        self.store.set(name, payload, expires).await
    }

    #[instrument(skip(self, context), fields(client_id = %context.client_id, secret_name = %name))]
    pub async fn remove(&self, context: &AuthContext, name: &str) -> Result<()> {
        self.authorize(context, SecretAction::Remove, name)?;
        self.store.remove(name).await
    }

    /// Names the caller is authorized to read, excluding logically-expired
    /// rows. The one operation where authorization is evaluated per result
    /// item rather than once up front; insufficient scopes filter the list
    /// down (possibly to empty) and never produce an error.
    #[instrument(skip(self, context), fields(client_id = %context.client_id))]
    pub async fn list(&self, context: &AuthContext) -> Result<Vec<String>> {
        if !context.satisfies(LIST_SCOPE) {
            return Ok(Vec::new());
        }

        let live = self.store.list_live(Utc::now()).await?;
        let readable = live
            .into_iter()
            .filter(|name| context.satisfies(&required_scope(SecretAction::Get, name)))
            .collect();

        Ok(readable)
    }

    fn authorize(&self, context: &AuthContext, action: SecretAction, name: &str) -> Result<()> {
        let required = required_scope(action, name);
        if context.satisfies(&required) {
            Ok(())
        } else {
            tracing::warn!(
                client_id = %context.client_id,
                required = %required,
                "scope check failed"
            );
            Err(Error::unauthorized(format!("missing required scope {}", required)))
        }
    }
}
