//! Referrals
//!
//! Players recommended to a club by its staff and partners.

pub mod handlers;
pub mod queries;
pub mod types;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::api::AppState;

pub use types::{CreateReferralRequest, Referral};

/// Create the referrals router, nested under `/api/clubs/{club_id}/referrals`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_referrals).post(handlers::create_referral),
        )
        .route("/{id}", delete(handlers::delete_referral))
}
