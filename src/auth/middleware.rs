//! Axum middleware for authentication.
//!
//! Resolves the bearer token against the injected [`ClientRegistry`] and
//! attaches the resulting [`AuthContext`] as a request extension. Scope
//! checks happen later, inside the authorization gate, so a bad token is
//! distinguishable from an insufficient one (401 vs 403).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info_span, warn};

use crate::api::error::ApiError;
use crate::auth::models::{AuthError, ClientRegistry};

pub type RegistryState = Arc<ClientRegistry>;

/// Middleware entry point that authenticates requests against the registry.
pub async fn authenticate(
    State(registry): State<RegistryState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %method,
        http.path = %path,
        correlation_id = %correlation_id
    );
    let _guard = span.enter();

    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");

    match registry.authenticate(header) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(%correlation_id, error = %err, "authentication failed");
            Err(map_auth_error(err))
        }
    }
}

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::MissingBearer | AuthError::UnknownToken => {
            ApiError::authentication_failed(err.to_string())
        }
    }
}
