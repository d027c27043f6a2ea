//! Rights management handlers.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::permissions::audit::actions;
use crate::permissions::{
    AccessError, AccessResult, AuditLogEntry, NewAuditEntry, OverrideMatrix,
};

use super::types::{
    PermissionGridResponse, ResetRoleResponse, RightsAdmin, UpdatePermissionsRequest,
    UpdatePermissionsResponse,
};

// ============================================================================
// Query Parameters
// ============================================================================

#[allow(clippy::missing_const_for_fn)]
fn default_limit() -> i64 {
    50
}

/// Audit log query parameters.
#[derive(Debug, Deserialize)]
pub struct AuditLogParams {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: i64,
    /// Filter by action prefix (e.g., "permissions." for all permission changes).
    pub action: Option<String>,
}

/// Audit log page.
#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub items: Vec<AuditLogEntry>,
    pub limit: i64,
    pub offset: i64,
}

/// Record an audit entry. The change it describes is already committed, so a
/// failed write is logged rather than returned.
async fn audit(state: &AppState, entry: NewAuditEntry) {
    let action = entry.action.clone();
    if let Err(e) = state.audit.record(entry).await {
        tracing::warn!(error = %e, action = %action, "Failed to write audit entry");
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Get the permission grid: every role against every module.
///
/// `GET /api/admin/permissions`
#[tracing::instrument(skip(state, _admin))]
pub async fn get_permissions(
    State(state): State<AppState>,
    Extension(_admin): Extension<RightsAdmin>,
) -> AccessResult<Json<PermissionGridResponse>> {
    let overrides = state.permissions.load_overrides().await?;
    Ok(Json(PermissionGridResponse::build(overrides)))
}

/// Audit entry for the committed part of a save.
fn overrides_saved(
    admin: &RightsAdmin,
    matrix: &OverrideMatrix,
    written: &[String],
    complete: bool,
) -> NewAuditEntry {
    let rows: serde_json::Map<String, serde_json::Value> = matrix
        .iter()
        .filter(|(role, _)| written.iter().any(|w| w == role))
        .map(|(role, row)| (role.to_string(), serde_json::json!(row)))
        .collect();

    NewAuditEntry::new(admin.user_id, actions::OVERRIDES_SAVED)
        .target("roles", written.join(","))
        .details(serde_json::json!({ "overrides": rows, "complete": complete }))
}

/// Save override rows.
///
/// `PUT /api/admin/permissions`
#[tracing::instrument(skip(state, admin, body), fields(admin = ?admin.user_id))]
pub async fn update_permissions(
    State(state): State<AppState>,
    Extension(admin): Extension<RightsAdmin>,
    Json(body): Json<UpdatePermissionsRequest>,
) -> AccessResult<Json<UpdatePermissionsResponse>> {
    let matrix = body.into_matrix();
    if matrix.is_empty() {
        return Err(AccessError::Validation("no roles to update".into()));
    }

    let saved = match state.permissions.save_overrides(&matrix, admin.user_id).await {
        Ok(saved) => saved,
        Err(failure) => {
            if !failure.written.is_empty() {
                audit(
                    &state,
                    overrides_saved(&admin, &matrix, &failure.written, false),
                )
                .await;
            }
            return Err(failure.error);
        }
    };

    audit(&state, overrides_saved(&admin, &matrix, &saved, true)).await;

    // The save is committed; a failed reload only drops the grid
    let grid = match state.permissions.load_overrides().await {
        Ok(overrides) => Some(PermissionGridResponse::build(overrides)),
        Err(e) => {
            tracing::warn!(error = %e, "Saved overrides but could not reload the grid");
            None
        }
    };

    Ok(Json(UpdatePermissionsResponse { saved, grid }))
}

/// Reset a role to its default permissions.
///
/// `DELETE /api/admin/permissions/{role}`
#[tracing::instrument(skip(state, admin), fields(admin = ?admin.user_id))]
pub async fn reset_role(
    State(state): State<AppState>,
    Extension(admin): Extension<RightsAdmin>,
    Path(role): Path<String>,
) -> AccessResult<Json<ResetRoleResponse>> {
    let reset = state.permissions.reset_role(&role, admin.user_id).await?;

    if reset {
        audit(
            &state,
            NewAuditEntry::new(admin.user_id, actions::ROLE_RESET).target("role", role.as_str()),
        )
        .await;
    }

    Ok(Json(ResetRoleResponse { role, reset }))
}

/// Get audit log entries.
///
/// `GET /api/admin/audit-log`
#[tracing::instrument(skip(state, _admin))]
pub async fn get_audit_log(
    State(state): State<AppState>,
    Extension(_admin): Extension<RightsAdmin>,
    Query(params): Query<AuditLogParams>,
) -> AccessResult<Json<AuditLogResponse>> {
    // Clamp limit to reasonable bounds
    let limit = params.limit.clamp(1, 100);
    let offset = params.offset.max(0);

    let items = state
        .audit
        .recent(limit, offset, params.action.as_deref())
        .await
        .map_err(|e| AccessError::Internal(e.to_string()))?;

    Ok(Json(AuditLogResponse {
        items,
        limit,
        offset,
    }))
}
