//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router. By default every adapter is in memory and the database pool is lazy,
//! so only handlers that query `PostgreSQL` directly need a database.
//!
//! ## Database tests
//!
//! Tests that need `PostgreSQL` are marked `#[ignore]` and use
//! [`TestApp::with_postgres`].
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use kader_server::api::{create_router, AppState, AppStateConfig};
use kader_server::auth::jwt::{self, ActAs};
use kader_server::auth::{Identity, MemoryIdentityProvider};
use kader_server::config::Config;
use kader_server::db;
use kader_server::permissions::{
    MemoryAuditSink, MemoryPermissionStore, PermissionService, PermissionStore,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub identities: Arc<MemoryIdentityProvider>,
    pub audit: Arc<MemoryAuditSink>,
}

impl TestApp {
    /// Create a test app with an in-memory override store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryPermissionStore::new())).0
    }

    /// Create a test app with an in-memory store and return the store too.
    pub fn with_memory_store() -> (Self, Arc<MemoryPermissionStore>) {
        let store = Arc::new(MemoryPermissionStore::new());
        let (app, _) = Self::with_store(store.clone());
        (app, store)
    }

    /// Create a test app over the given override store.
    pub fn with_store(store: Arc<dyn PermissionStore>) -> (Self, Arc<dyn PermissionStore>) {
        let config = Config::default_for_test();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("Failed to create lazy pool");
        let identities = Arc::new(MemoryIdentityProvider::new());
        let audit = Arc::new(MemoryAuditSink::new());

        let state = AppState::new(AppStateConfig {
            db: pool.clone(),
            config: config.clone(),
            permissions: PermissionService::new(store.clone()),
            identities: identities.clone(),
            audit: audit.clone(),
        });

        let app = Self {
            router: create_router(state),
            pool,
            config: Arc::new(config),
            identities,
            audit,
        };
        (app, store)
    }

    /// Create a test app whose overrides live in `PostgreSQL`.
    ///
    /// Identities stay in memory; the `users` rows are created by
    /// [`insert_db_user`] where a handler joins against them.
    pub async fn with_postgres() -> Self {
        let config = Config::default_for_test();
        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to connect to test DB");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let identities = Arc::new(MemoryIdentityProvider::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let state = AppState::new(AppStateConfig {
            db: pool.clone(),
            config: config.clone(),
            permissions: PermissionService::new(Arc::new(
                kader_server::permissions::PgPermissionStore::new(pool.clone()),
            )),
            identities: identities.clone(),
            audit: audit.clone(),
        });

        Self {
            router: create_router(state),
            pool,
            config: Arc::new(config),
            identities,
            audit,
        }
    }

    /// Register a user with `role` in `club_id` and return its identity.
    pub fn add_user(&self, role: &str, club_id: Option<Uuid>) -> Identity {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: Some(format!("{}@club.test", role.to_lowercase().replace(' ', "-"))),
            role: role.to_string(),
            club_id,
        };
        self.identities.insert(identity.clone());
        identity
    }

    /// Access token for a user.
    pub fn token_for(&self, user_id: Uuid) -> String {
        jwt::generate_access_token(
            user_id,
            None,
            &self.config.jwt_private_key,
            self.config.jwt_access_expiry,
        )
        .expect("Failed to generate token")
        .access_token
    }

    /// Act-as token, signed with the server key.
    pub fn act_as_token(&self, user_id: Uuid, act: ActAs) -> String {
        jwt::generate_access_token(
            user_id,
            Some(act),
            &self.config.jwt_private_key,
            self.config.impersonation_expiry,
        )
        .expect("Failed to generate token")
        .access_token
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send an authenticated request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Self::request(method, uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.oneshot(request).await
    }
}

// ============================================================================
// Database helpers
// ============================================================================

/// Remove all override rows (for `#[ignore]` database tests).
pub async fn clear_overrides(pool: &PgPool) {
    sqlx::query("DELETE FROM role_permission_overrides")
        .execute(pool)
        .await
        .expect("Failed to clear overrides");
}

/// Insert a `users` row matching an in-memory identity.
pub async fn insert_db_user(pool: &PgPool, identity: &Identity) {
    sqlx::query("INSERT INTO users (id, email, role, club_id) VALUES ($1, $2, $3, $4)")
        .bind(identity.user_id)
        .bind(identity.email.as_deref())
        .bind(&identity.role)
        .bind(identity.club_id)
        .execute(pool)
        .await
        .expect("Failed to insert user");
}

// ============================================================================
// Response helpers
// ============================================================================

/// Read the response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}
