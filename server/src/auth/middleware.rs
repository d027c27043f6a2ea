//! Context Middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::permissions::AccessError;

use super::error::AuthError;
use super::jwt::{validate_access_token, Claims};

/// Extract and validate the bearer token, if any.
fn session_from_request(request: &Request, public_key: &str) -> Result<Option<Claims>, AuthError> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidAuthHeader)?;

    validate_access_token(token, public_key).map(Some)
}

/// Middleware to require a resolved execution context.
///
/// Validates the bearer token, resolves the context against the identity
/// provider and injects [`ExecutionContext`](super::ExecutionContext) into
/// request extensions. Every failure is answered with the generic denial.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, require_context))
/// ```
pub async fn require_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AccessError> {
    let session = match session_from_request(&request, &state.config.jwt_public_key) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(reason = %e, "Context unavailable: rejected session token");
            return Err(AccessError::ContextUnavailable(e.to_string()));
        }
    };

    let ctx = match state.context_resolver().resolve(session.as_ref()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!(reason = %e, "Context unavailable");
            return Err(e.into());
        }
    };

    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}
