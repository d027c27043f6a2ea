//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod navigation;

use axum::{
    extract::State,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    admin,
    auth::{self, ContextResolver, IdentityProvider, PgIdentityProvider},
    config::Config,
    permissions::{AuditSink, PermissionService, PgAuditSink, PgPermissionStore},
    referrals,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Override administration and evaluator construction
    pub permissions: PermissionService,
    /// Identity provider for context resolution
    pub identities: Arc<dyn IdentityProvider>,
    /// Audit trail
    pub audit: Arc<dyn AuditSink>,
}

/// Adapters needed to build [`AppState`].
pub struct AppStateConfig {
    pub db: PgPool,
    pub config: Config,
    pub permissions: PermissionService,
    pub identities: Arc<dyn IdentityProvider>,
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(state: AppStateConfig) -> Self {
        Self {
            db: state.db,
            config: Arc::new(state.config),
            permissions: state.permissions,
            identities: state.identities,
            audit: state.audit,
        }
    }

    /// Create application state with every adapter backed by `PostgreSQL`.
    #[must_use]
    pub fn with_postgres(db: PgPool, config: Config) -> Self {
        Self::new(AppStateConfig {
            permissions: PermissionService::new(Arc::new(PgPermissionStore::new(db.clone()))),
            identities: Arc::new(PgIdentityProvider::new(db.clone())),
            audit: Arc::new(PgAuditSink::new(db.clone())),
            db,
            config,
        })
    }

    /// Resolver over the configured identity provider.
    #[must_use]
    pub fn context_resolver(&self) -> ContextResolver {
        ContextResolver::new(self.identities.clone())
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.cors_allowed_origins {
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Every API route runs with a resolved execution context
    let protected_routes = Router::new()
        .route("/api/me/context", get(navigation::get_context))
        .route("/api/me/permissions", get(navigation::get_my_permissions))
        .route("/api/navigation", get(navigation::get_navigation))
        .nest("/api/auth", auth::router())
        .nest("/api/admin", admin::router(state.clone()))
        .nest("/api/clubs/{club_id}/referrals", referrals::router())
        .layer(from_fn_with_state(state.clone(), auth::require_context));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Server version
    version: &'static str,
    /// Whether CORS is restricted to configured origins
    cors_restricted: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cors_restricted: state.config.cors_allowed_origins.is_some(),
    })
}
