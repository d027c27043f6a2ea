//! Referral handlers.
//!
//! Access levels on the Referrals module:
//! - Limited: list own referrals, create referrals
//! - Full: list all referrals of the club, delete referrals

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kader_common::PermissionLevel;
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::auth::ExecutionContext;
use crate::permissions::modules::REFERRALS;
use crate::permissions::{require_club_scope, require_module_level, AccessError, AccessResult};

use super::queries;
use super::types::{CreateReferralRequest, Referral};

/// Check module level and club scope in one step.
async fn authorize(
    state: &AppState,
    ctx: &ExecutionContext,
    club_id: Uuid,
    level: PermissionLevel,
) -> AccessResult<PermissionLevel> {
    let evaluator = state.permissions.evaluator().await;
    let effective = require_module_level(&evaluator, ctx, REFERRALS, level)?;
    require_club_scope(ctx, club_id)?;
    Ok(effective)
}

/// List referrals of a club.
///
/// `GET /api/clubs/{club_id}/referrals`
#[tracing::instrument(skip(state, ctx), fields(role = %ctx.role))]
pub async fn list_referrals(
    State(state): State<AppState>,
    ctx: ExecutionContext,
    Path(club_id): Path<Uuid>,
) -> AccessResult<Json<Vec<Referral>>> {
    let level = authorize(&state, &ctx, club_id, PermissionLevel::Limited).await?;

    let referred_by = if level == PermissionLevel::Full {
        None
    } else {
        Some(
            ctx.actor_id()
                .ok_or_else(|| AccessError::ContextUnavailable("no user on context".into()))?,
        )
    };

    let referrals = queries::list_referrals(&state.db, club_id, referred_by).await?;
    Ok(Json(referrals))
}

/// Create a referral.
///
/// `POST /api/clubs/{club_id}/referrals`
#[tracing::instrument(skip(state, ctx, body), fields(role = %ctx.role))]
pub async fn create_referral(
    State(state): State<AppState>,
    ctx: ExecutionContext,
    Path(club_id): Path<Uuid>,
    Json(body): Json<CreateReferralRequest>,
) -> AccessResult<(StatusCode, Json<Referral>)> {
    authorize(&state, &ctx, club_id, PermissionLevel::Limited).await?;

    body.validate()
        .map_err(|e| AccessError::Validation(e.to_string()))?;
    if body.player_name.trim().is_empty() {
        return Err(AccessError::Validation("Player name must not be blank".into()));
    }

    let referred_by = ctx
        .actor_id()
        .ok_or_else(|| AccessError::ContextUnavailable("no user on context".into()))?;

    let referral = queries::create_referral(&state.db, club_id, referred_by, &body).await?;
    tracing::info!(referral_id = %referral.id, club_id = %club_id, "Referral created");

    Ok((StatusCode::CREATED, Json(referral)))
}

/// Delete a referral.
///
/// `DELETE /api/clubs/{club_id}/referrals/{id}`
#[tracing::instrument(skip(state, ctx), fields(role = %ctx.role))]
pub async fn delete_referral(
    State(state): State<AppState>,
    ctx: ExecutionContext,
    Path((club_id, id)): Path<(Uuid, Uuid)>,
) -> AccessResult<StatusCode> {
    authorize(&state, &ctx, club_id, PermissionLevel::Full).await?;

    if queries::delete_referral(&state.db, club_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AccessError::NotFound("Referral".into()))
    }
}
