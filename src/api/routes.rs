//! Router assembly: the secured operation surface plus the open probes.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::middleware::authenticate;
use crate::auth::ClientRegistry;

use super::handlers::{
    expire_handler, get_secret_handler, health_handler, list_secrets_handler,
    remove_secret_handler, set_secret_handler,
};
use super::handlers::ApiState;

pub fn build_router(state: ApiState, registry: Arc<ClientRegistry>) -> Router {
    let auth_layer = middleware::from_fn_with_state(registry, authenticate);

    let secured_api = Router::new()
        .route("/api/v1/secrets", get(list_secrets_handler))
        .route(
            "/api/v1/secrets/{*name}",
            get(get_secret_handler).put(set_secret_handler).delete(remove_secret_handler),
        )
        .route("/api/v1/expire", post(expire_handler))
        .with_state(state)
        .layer(auth_layer);

    secured_api
        .merge(Router::new().route("/health", get(health_handler)))
        .layer(TraceLayer::new_for_http())
}
