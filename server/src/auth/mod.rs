//! Authentication and Execution Context
//!
//! Validates session tokens, resolves who is acting for each request and
//! handles Super-Admin impersonation. Credential verification belongs to the
//! identity provider.

pub mod context;
mod error;
pub mod identity;
mod impersonation;
pub mod jwt;
mod middleware;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use context::{ContextError, ContextResolver, ExecutionContext};
pub use error::{AuthError, AuthResult};
pub use identity::{
    Identity, IdentityError, IdentityProvider, MemoryIdentityProvider, PgIdentityProvider,
};
pub use impersonation::{StartImpersonationRequest, TokenResponse};
pub use middleware::require_context;

/// Create the auth router.
///
/// Routes (context required):
/// - POST /impersonation - Start impersonating a role (Super-Admin only)
/// - DELETE /impersonation - Return to the real identity
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/impersonation",
        post(impersonation::start_impersonation).delete(impersonation::end_impersonation),
    )
}
