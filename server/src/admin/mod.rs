//! Rights Management Module
//!
//! Endpoints for the roles-and-rights administration screen. Every route
//! requires full access to the Roles & Rights module.

pub mod handlers;
pub mod middleware;
pub mod types;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get},
    Router,
};

use crate::api::AppState;

pub use middleware::require_rights_admin;
pub use types::{
    PermissionGridResponse, RightsAdmin, UpdatePermissionsRequest, UpdatePermissionsResponse,
};

/// Create the admin router.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/permissions",
            get(handlers::get_permissions).put(handlers::update_permissions),
        )
        .route("/permissions/{role}", delete(handlers::reset_role))
        .route("/audit-log", get(handlers::get_audit_log))
        .layer(from_fn_with_state(state, require_rights_admin))
}
