//! HTTP handlers mapping routes 1:1 onto the logical operation surface.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::auth::AuthContext;
use crate::errors::Error;
use crate::secrets::{ExpirySweeper, SecretService};

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<SecretService>,
    pub sweeper: Arc<ExpirySweeper>,
}

/// `PUT /api/v1/secrets/{*name}` - create or fully replace a secret.
///
/// The body is taken as a raw JSON document so validation failures and
/// authorization failures can still echo a redacted copy of it.
pub async fn set_secret_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let result = async {
        let payload = body
            .get("secret")
            .ok_or_else(|| Error::validation("request body must include a secret field"))?;
        let expires = parse_expires(&body)?;
        state.service.set(&context, &name, payload, expires).await
    }
    .await;

    match result {
        Ok(()) => Ok(Json(json!({}))),
        Err(err) => Err(ApiError::from(err).with_request_info("set", &name, &body)),
    }
}

/// `GET /api/v1/secrets/{*name}` - read a secret.
pub async fn get_secret_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let secret = state.service.get(&context, &name).await?;
    Ok(Json(json!({
        "secret": secret.payload,
        "expires": secret.expires.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })))
}

/// `DELETE /api/v1/secrets/{*name}` - remove a secret. Expired-but-unpurged
/// rows are removable; only a physically absent row is 404.
pub async fn remove_secret_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.remove(&context, &name).await?;
    Ok(Json(json!({})))
}

/// `GET /api/v1/secrets` - names the caller could individually read.
pub async fn list_secrets_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Value>, ApiError> {
    let names = state.service.list(&context).await?;
    Ok(Json(json!({ "secrets": names })))
}

/// `POST /api/v1/expire` - trigger one sweep. Best-effort: failures are
/// logged, the response is always an empty success body.
pub async fn expire_handler(State(state): State<ApiState>) -> Json<Value> {
    if let Err(err) = state.sweeper.run_once().await {
        tracing::warn!(error = %err, "On-demand expiry sweep failed");
    }
    Json(json!({}))
}

/// `GET /health` - liveness probe, unauthenticated.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn parse_expires(body: &Value) -> Result<DateTime<Utc>, Error> {
    let raw = body
        .get("expires")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::validation("request body must include an expires timestamp"))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::validation(format!("invalid expires timestamp: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_expires_accepts_rfc3339() {
        let body = json!({"expires": "2026-09-01T12:30:00.000Z"});
        let parsed = parse_expires(&body).unwrap();
        assert_eq!(parsed.to_rfc3339_opts(chrono::SecondsFormat::Millis, true), "2026-09-01T12:30:00.000Z");
    }

    #[test]
    fn parse_expires_rejects_garbage() {
        for body in [json!({}), json!({"expires": 5}), json!({"expires": "next tuesday"})] {
            assert!(matches!(parse_expires(&body), Err(Error::Validation(_))));
        }
    }
}
