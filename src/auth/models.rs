//! Data models for the caller-facing authentication boundary.

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::scope::{self, Scope};
use crate::config::ClientConfig;

/// Request-scoped authentication context for one caller.
///
/// Holds the caller's identity and its granted scope set, parsed once into
/// the tagged [`Scope`] representation. Authorization decisions are derived
/// from this context fresh per request and never cached across requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub client_id: String,
    scopes: Vec<Scope>,
}

impl AuthContext {
    pub fn new<S: Into<String>>(client_id: S, scopes: Vec<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes: scopes.iter().map(|s| Scope::parse(s)).collect(),
        }
    }

    /// Whether the granted set satisfies the required scope.
    pub fn satisfies(&self, required: &str) -> bool {
        scope::satisfies(required, &self.scopes)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }
}

/// Static bearer-token registry standing in for the external identity
/// collaborator. The store trusts the scope set it produces as given.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    by_token: HashMap<String, AuthContext>,
}

impl ClientRegistry {
    pub fn new(clients: &[ClientConfig]) -> Self {
        let by_token = clients
            .iter()
            .map(|client| {
                (
                    client.token.clone(),
                    AuthContext::new(client.client_id.clone(), client.scopes.clone()),
                )
            })
            .collect();
        Self { by_token }
    }

    /// Resolve an `Authorization` header value to a caller context.
    pub fn authenticate(&self, header: &str) -> Result<AuthContext, AuthError> {
        let token = header.trim();
        if token.is_empty() {
            return Err(AuthError::MissingBearer);
        }

        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        self.by_token.get(token).cloned().ok_or(AuthError::UnknownToken)
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// Errors returned by the authentication middleware.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: bearer token missing")]
    MissingBearer,
    #[error("unauthorized: unknown token")]
    UnknownToken,
}
