/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - In-memory database setup with migrations applied
/// - Router construction with a fixed test configuration
/// - Request helpers for JSON endpoints with and without a bearer token

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::Service as _;
use townsquare_api::app::{build_router, AppState};
use townsquare_api::config::{ApiConfig, Config, DatabaseConfig as ApiDatabaseConfig, JwtConfig};
use townsquare_shared::db::migrations::run_migrations;
use townsquare_shared::db::pool::{create_pool, DatabaseConfig};

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        })
        .await?;

        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: ApiDatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a JSON request and returns the status plus the parsed body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .app
            .clone()
            .call(request)
            .await
            .expect("router call is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };

        (status, body)
    }

    /// Registers an account and returns its bearer token and user view
    ///
    /// The tag keeps email/username/phone unique across accounts in one test.
    pub async fn register(&self, tag: &str) -> (String, Value) {
        let (status, body) = self
            .request("POST", "/v1/auth/register", None, Some(register_payload(tag)))
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        let token = body["data"]["token"]
            .as_str()
            .expect("token should be present")
            .to_string();

        (token, body["data"]["user"].clone())
    }
}

/// Builds a valid registration payload for the given tag
pub fn register_payload(tag: &str) -> Value {
    // Phone numbers stay valid as long as the tag is at most 7 digits
    json!({
        "email": format!("{tag}@example.com"),
        "username": format!("user_{tag}"),
        "password": "Abc12345!",
        "firstName": "Ada",
        "surname": "Obi",
        "phone": format!("0801{:0>7}", tag.len()),
        "agreeTerms": true
    })
}
