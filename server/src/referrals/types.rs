//! Referral types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A player recommended to a club.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Referral {
    pub id: Uuid,
    pub club_id: Uuid,
    pub player_name: String,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub referred_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/clubs/{club_id}/referrals`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReferralRequest {
    #[validate(length(min = 1, max = 120, message = "Player name must be 1-120 characters"))]
    pub player_name: String,
    #[validate(length(max = 60))]
    pub position: Option<String>,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}
