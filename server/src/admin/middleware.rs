//! Admin authorization middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use kader_common::PermissionLevel;

use super::types::RightsAdmin;
use crate::api::AppState;
use crate::auth::ExecutionContext;
use crate::permissions::modules::ROLES_AND_RIGHTS;
use crate::permissions::{require_module_level, AccessError};

/// Middleware that requires full access to Roles & Rights.
#[tracing::instrument(skip(state, request, next))]
pub async fn require_rights_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AccessError> {
    let ctx = request
        .extensions()
        .get::<ExecutionContext>()
        .cloned()
        .ok_or_else(|| AccessError::ContextUnavailable("no context on request".into()))?;

    let evaluator = state.permissions.evaluator().await;
    require_module_level(&evaluator, &ctx, ROLES_AND_RIGHTS, PermissionLevel::Full)?;

    request
        .extensions_mut()
        .insert(RightsAdmin { user_id: ctx.user_id });

    Ok(next.run(request).await)
}
