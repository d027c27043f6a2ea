//! Database queries for referrals.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::{CreateReferralRequest, Referral};

/// List referrals of a club, newest first.
///
/// With `referred_by`, only that user's referrals are returned.
pub async fn list_referrals(
    pool: &PgPool,
    club_id: Uuid,
    referred_by: Option<Uuid>,
) -> sqlx::Result<Vec<Referral>> {
    sqlx::query_as::<_, Referral>(
        r"
        SELECT id, club_id, player_name, position, notes, referred_by, created_at
        FROM referrals
        WHERE club_id = $1
          AND ($2::uuid IS NULL OR referred_by = $2)
        ORDER BY created_at DESC
        ",
    )
    .bind(club_id)
    .bind(referred_by)
    .fetch_all(pool)
    .await
}

/// Create a referral.
pub async fn create_referral(
    pool: &PgPool,
    club_id: Uuid,
    referred_by: Uuid,
    request: &CreateReferralRequest,
) -> sqlx::Result<Referral> {
    sqlx::query_as::<_, Referral>(
        r"
        INSERT INTO referrals (id, club_id, player_name, position, notes, referred_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, club_id, player_name, position, notes, referred_by, created_at
        ",
    )
    .bind(Uuid::now_v7())
    .bind(club_id)
    .bind(request.player_name.trim())
    .bind(request.position.as_deref())
    .bind(request.notes.as_deref())
    .bind(referred_by)
    .fetch_one(pool)
    .await
}

/// Delete a referral of a club.
///
/// Returns `true` if a referral was removed.
pub async fn delete_referral(pool: &PgPool, club_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM referrals WHERE club_id = $1 AND id = $2")
        .bind(club_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
