//! Identity provider adapters.
//!
//! The identity provider owns user accounts and their role assignment. This
//! server only reads from it.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

/// Authenticated user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Role identifier as stored. May be a value this build does not know.
    pub role: String,
    pub club_id: Option<Uuid>,
}

/// Identity lookup failure.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

/// Source of authenticated identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up an active user. Returns `None` for unknown or deactivated users.
    async fn find_identity(&self, user_id: Uuid) -> Result<Option<Identity>, IdentityError>;
}

/// Identity provider backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    #[tracing::instrument(skip(self))]
    async fn find_identity(&self, user_id: Uuid) -> Result<Option<Identity>, IdentityError> {
        let identity = sqlx::query_as::<_, Identity>(
            r"
            SELECT id AS user_id, email, role, club_id
            FROM users
            WHERE id = $1
              AND deactivated_at IS NULL
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }
}

/// In-memory identity provider for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    identities: DashMap<Uuid, Identity>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an identity.
    pub fn insert(&self, identity: Identity) {
        self.identities.insert(identity.user_id, identity);
    }

    /// Remove an identity (simulates deactivation).
    pub fn remove(&self, user_id: Uuid) -> Option<Identity> {
        self.identities.remove(&user_id).map(|(_, identity)| identity)
    }

    /// Change the stored role of a user.
    pub fn set_role(&self, user_id: Uuid, role: &str) -> bool {
        self.identities
            .get_mut(&user_id)
            .map(|mut identity| identity.role = role.to_string())
            .is_some()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn find_identity(&self, user_id: Uuid) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.get(&user_id).map(|entry| entry.clone()))
    }
}
