//! Role impersonation for Super-Admins.
//!
//! Starting an impersonation issues a short-lived access token carrying an
//! act-as claim. Every request presenting it is resolved again, so a demoted
//! administrator loses the impersonation immediately.

use std::str::FromStr;

use axum::{extract::State, Json};
use kader_common::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::context::ExecutionContext;
use super::jwt::{generate_access_token, ActAs, IssuedToken};
use crate::api::AppState;
use crate::permissions::audit::actions;
use crate::permissions::{AccessError, AccessResult, NewAuditEntry};

/// Request body for `POST /api/auth/impersonation`.
#[derive(Debug, Deserialize, Validate)]
pub struct StartImpersonationRequest {
    /// Role to act as.
    #[validate(length(min = 1, max = 64))]
    pub role: String,
    /// Club to act for.
    pub club_id: Option<Uuid>,
}

/// Issued token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    /// Effective role of the new token.
    pub role: String,
    pub club_id: Option<Uuid>,
}

impl TokenResponse {
    fn new(token: IssuedToken, role: String, club_id: Option<Uuid>) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "Bearer",
            expires_in: token.expires_in,
            role,
            club_id,
        }
    }
}

fn token_error(e: &super::AuthError) -> AccessError {
    AccessError::Internal(format!("token issue failed: {e}"))
}

/// Record an audit entry. A failed write does not undo the token.
async fn audit(state: &AppState, entry: NewAuditEntry) {
    if let Err(e) = state.audit.record(entry).await {
        tracing::warn!(error = %e, "Failed to write impersonation audit entry");
    }
}

/// Start impersonating a role.
///
/// `POST /api/auth/impersonation`
#[tracing::instrument(skip(state, ctx), fields(actor = ?ctx.user_id))]
pub async fn start_impersonation(
    State(state): State<AppState>,
    ctx: ExecutionContext,
    Json(body): Json<StartImpersonationRequest>,
) -> AccessResult<Json<TokenResponse>> {
    if ctx.is_impersonating() || ctx.known_role() != Some(Role::SuperAdmin) {
        tracing::info!(role = %ctx.role, "Impersonation denied");
        return Err(AccessError::OutOfScope);
    }
    let user_id = ctx
        .user_id
        .ok_or_else(|| AccessError::ContextUnavailable("no user on context".into()))?;

    body.validate()
        .map_err(|e| AccessError::Validation(e.to_string()))?;

    let target = Role::from_str(&body.role)
        .map_err(|_| AccessError::Validation(format!("unknown role: {}", body.role)))?;
    if target == Role::SuperAdmin {
        return Err(AccessError::Validation(
            "cannot impersonate Super-Admin".into(),
        ));
    }

    let act = ActAs {
        role: target.as_str().to_string(),
        club_id: body.club_id,
        original_sub: user_id.to_string(),
    };
    let token = generate_access_token(
        user_id,
        Some(act),
        &state.config.jwt_private_key,
        state.config.impersonation_expiry,
    )
    .map_err(|e| token_error(&e))?;

    audit(
        &state,
        NewAuditEntry::new(Some(user_id), actions::IMPERSONATION_STARTED)
            .target("role", target.as_str())
            .details(serde_json::json!({
                "club_id": body.club_id,
                "token_id": token.token_id,
                "expires_in": token.expires_in,
            })),
    )
    .await;

    tracing::info!(role = %target, club_id = ?body.club_id, "Impersonation started");

    Ok(Json(TokenResponse::new(
        token,
        target.as_str().to_string(),
        body.club_id,
    )))
}

/// Stop impersonating and return a plain token for the real identity.
///
/// `DELETE /api/auth/impersonation`
#[tracing::instrument(skip(state, ctx), fields(actor = ?ctx.user_id))]
pub async fn end_impersonation(
    State(state): State<AppState>,
    ctx: ExecutionContext,
) -> AccessResult<Json<TokenResponse>> {
    let Some(original) = ctx.impersonator else {
        return Err(AccessError::Validation("not impersonating".into()));
    };

    let token = generate_access_token(
        original.user_id,
        None,
        &state.config.jwt_private_key,
        state.config.jwt_access_expiry,
    )
    .map_err(|e| token_error(&e))?;

    audit(
        &state,
        NewAuditEntry::new(Some(original.user_id), actions::IMPERSONATION_ENDED)
            .target("role", ctx.role.as_str())
            .details(serde_json::json!({ "club_id": ctx.club_id })),
    )
    .await;

    tracing::info!(role = %ctx.role, "Impersonation ended");

    Ok(Json(TokenResponse::new(
        token,
        original.role,
        original.club_id,
    )))
}
