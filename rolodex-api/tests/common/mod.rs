/// Common test utilities for integration tests
///
/// These tests drive the full router (auth middleware included) against a
/// real PostgreSQL database. When DATABASE_URL is not set the suite is
/// skipped, so `cargo test` stays green without infrastructure.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use rolodex_api::app::{build_router, AppState};
use rolodex_api::config::{ApiConfig, Config, ContactsConfig, DatabaseConfig, JwtConfig};
use rolodex_shared::db::migrations::run_migrations;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique suffix for emails so tests never trip the uniqueness constraint
pub fn unique_tag() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}-{}", nanos, SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Test context holding the app router and database pool
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context, or None when no database is configured
    pub async fn new() -> anyhow::Result<Option<Self>> {
        dotenvy::dotenv().ok();
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("skipping: DATABASE_URL not set");
            return Ok(None);
        };

        let db = PgPool::connect(&database_url).await?;
        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-key-32-bytes!".to_string(),
            },
            contacts: ContactsConfig {
                birthday_window_days: 7,
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Registers a fresh user and returns (access_token, refresh_token, user_id)
    pub async fn register_user(&self) -> (String, String, i64) {
        let email = format!("it-{}@example.com", unique_tag());
        let request = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "username": "it-user",
                    "email": email,
                    "password": "integration_pass_1"
                })
                .to_string(),
            ))
            .unwrap();

        let response = self.send(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
            body["user_id"].as_i64().unwrap(),
        )
    }

    /// Creates a contact for the given bearer token, returning its JSON
    pub async fn create_contact(
        &self,
        token: &str,
        payload: serde_json::Value,
    ) -> serde_json::Value {
        let request = Request::builder()
            .method("POST")
            .uri("/contacts/")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();

        let response = self.send(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid contact payload with a distinguishable first name
pub fn contact_payload(first_name: &str, birthday: &str) -> serde_json::Value {
    serde_json::json!({
        "first_name": first_name,
        "last_name": "Integration",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "phone": "+1 555 0100",
        "birthday": birthday,
        "notes": null
    })
}

/// Builds an authenticated GET request
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}
