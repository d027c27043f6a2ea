//! Context, effective permissions and navigation for the current caller.
//!
//! These endpoints describe what the caller may see. They grant nothing:
//! every operation checks access again on its own.

use axum::{extract::State, Json};
use kader_common::NavigationEntry;
use serde::Serialize;
use uuid::Uuid;

use super::AppState;
use crate::auth::ExecutionContext;
use crate::permissions::ModulePermission;

/// Real identity behind an impersonated context.
#[derive(Debug, Serialize)]
pub struct ImpersonatorInfo {
    pub user_id: Uuid,
    pub role: String,
}

/// Response for `GET /api/me/context`.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub role: String,
    pub club_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub impersonating: bool,
    pub impersonator: Option<ImpersonatorInfo>,
}

impl From<ExecutionContext> for ContextResponse {
    fn from(ctx: ExecutionContext) -> Self {
        let impersonating = ctx.is_impersonating();
        Self {
            role: ctx.role,
            club_id: ctx.club_id,
            user_id: ctx.user_id,
            email: ctx.email,
            impersonating,
            impersonator: ctx.impersonator.map(|identity| ImpersonatorInfo {
                user_id: identity.user_id,
                role: identity.role,
            }),
        }
    }
}

/// Response for `GET /api/me/permissions`.
#[derive(Debug, Serialize)]
pub struct MyPermissionsResponse {
    pub role: String,
    /// Whether an administrator override governs this role.
    pub overridden: bool,
    pub modules: Vec<ModulePermission>,
}

/// Get the resolved execution context.
///
/// `GET /api/me/context`
pub async fn get_context(ctx: ExecutionContext) -> Json<ContextResponse> {
    Json(ContextResponse::from(ctx))
}

/// Get the effective permission row of the current role.
///
/// `GET /api/me/permissions`
#[tracing::instrument(skip(state, ctx), fields(role = %ctx.role))]
pub async fn get_my_permissions(
    State(state): State<AppState>,
    ctx: ExecutionContext,
) -> Json<MyPermissionsResponse> {
    let evaluator = state.permissions.evaluator().await;

    Json(MyPermissionsResponse {
        modules: evaluator.permission_row(&ctx.role),
        overridden: evaluator.is_overridden(&ctx.role),
        role: ctx.role,
    })
}

/// Get the navigation entries visible to the current role.
///
/// `GET /api/navigation`
#[tracing::instrument(skip(state, ctx), fields(role = %ctx.role))]
pub async fn get_navigation(
    State(state): State<AppState>,
    ctx: ExecutionContext,
) -> Json<Vec<&'static NavigationEntry>> {
    let evaluator = state.permissions.evaluator().await;
    Json(evaluator.visible_navigation(&ctx.role))
}
