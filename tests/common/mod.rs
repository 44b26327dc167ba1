use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use lockbox::{
    api::{build_router, ApiState},
    auth::ClientRegistry,
    config::{ClientConfig, DatabaseConfig},
    secrets::{ExpirySweeper, SecretService, SecretStore},
    storage::{self, SqlxSecretRepository},
};

/// Fixed bearer tokens for the scoped test clients.
pub const CAPTAIN_WRITE: &str = "token-captain-write";
pub const CAPTAIN_READ: &str = "token-captain-read";
pub const CAPTAIN_READ_WRITE: &str = "token-captain-read-write";
pub const CAPTAIN_READ_LIMITED: &str = "token-captain-read-limited";

pub struct TestApp {
    router: Router,
    pub sweeper: Arc<ExpirySweeper>,
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = if let Some(json) = body {
            let bytes = serde_json::to_vec(&json).expect("serialize body");
            builder
                .header("content-type", "application/json")
                .body(Body::from(bytes))
                .expect("build request")
        } else {
            builder.body(Body::empty()).expect("build request")
        };

        self.router.clone().oneshot(request).await.expect("request")
    }

    pub async fn set(&self, token: &str, name: &str, body: Value) -> Response<Body> {
        self.send(Method::PUT, &secret_path(name), Some(token), Some(body)).await
    }

    pub async fn get(&self, token: &str, name: &str) -> Response<Body> {
        self.send(Method::GET, &secret_path(name), Some(token), None).await
    }

    pub async fn remove(&self, token: &str, name: &str) -> Response<Body> {
        self.send(Method::DELETE, &secret_path(name), Some(token), None).await
    }

    pub async fn list(&self, token: &str) -> Response<Body> {
        self.send(Method::GET, "/api/v1/secrets", Some(token), None).await
    }

    pub async fn expire(&self, token: &str) -> Response<Body> {
        self.send(Method::POST, "/api/v1/expire", Some(token), None).await
    }
}

fn secret_path(name: &str) -> String {
    format!("/api/v1/secrets/{}", name)
}

fn test_clients() -> Vec<ClientConfig> {
    vec![
        ClientConfig {
            client_id: "captain-write".into(),
            token: CAPTAIN_WRITE.into(),
            scopes: vec!["secrets:set:captain:*".into(), "secrets:remove:captain:*".into()],
        },
        ClientConfig {
            client_id: "captain-read".into(),
            token: CAPTAIN_READ.into(),
            scopes: vec!["secrets:get:captain:*".into()],
        },
        ClientConfig {
            client_id: "captain-read-write".into(),
            token: CAPTAIN_READ_WRITE.into(),
            scopes: vec![
                "secrets:list".into(),
                "secrets:get:captain:*".into(),
                "secrets:set:captain:*".into(),
                "secrets:remove:captain:*".into(),
            ],
        },
        ClientConfig {
            client_id: "captain-read-limited".into(),
            token: CAPTAIN_READ_LIMITED.into(),
            scopes: vec!["secrets:list".into(), "secrets:get:captain:limited/*".into()],
        },
    ]
}

/// Bring up an isolated app over a private in-memory database.
pub async fn setup_test_app() -> TestApp {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        ..Default::default()
    };
    let pool = storage::create_pool(&config).await.expect("create sqlite pool");
    storage::run_migrations(&pool).await.expect("run migrations for tests");

    let repository = Arc::new(SqlxSecretRepository::new(pool));
    let store = Arc::new(SecretStore::new(repository));
    let service = Arc::new(SecretService::new(store.clone()));
    let sweeper = Arc::new(ExpirySweeper::new(store));
    let registry = Arc::new(ClientRegistry::new(&test_clients()));

    let state = ApiState { service, sweeper: sweeper.clone() };
    TestApp { router: build_router(state, registry), sweeper }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}
