//! Execution context resolution.
//!
//! The context answers "who is acting, in which role, for which club" for a
//! single request. It is derived from the session token and the identity
//! provider on every request and never cached.

use std::str::FromStr;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use kader_common::Role;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::identity::{Identity, IdentityError, IdentityProvider};
use super::jwt::Claims;
use crate::permissions::AccessError;

/// Resolved caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionContext {
    /// Effective role identifier. During impersonation, the impersonated role.
    pub role: String,
    /// Effective club scope.
    pub club_id: Option<Uuid>,
    /// Authenticated user. Never replaced by impersonation.
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    /// The real identity behind an impersonated context.
    pub impersonator: Option<Identity>,
}

impl ExecutionContext {
    /// Context acting as the identity itself.
    #[must_use]
    pub fn from_identity(identity: Identity) -> Self {
        Self {
            role: identity.role,
            club_id: identity.club_id,
            user_id: Some(identity.user_id),
            email: identity.email,
            impersonator: None,
        }
    }

    #[must_use]
    pub const fn is_impersonating(&self) -> bool {
        self.impersonator.is_some()
    }

    /// Parsed effective role, if it is a known role.
    #[must_use]
    pub fn known_role(&self) -> Option<Role> {
        Role::from_str(&self.role).ok()
    }

    /// Whether the effective role may act on `club_id`.
    ///
    /// Super-Admin spans all clubs; every other role is bound to its own.
    #[must_use]
    pub fn can_access_club(&self, club_id: Uuid) -> bool {
        self.known_role() == Some(Role::SuperAdmin) || self.club_id == Some(club_id)
    }

    /// User to attribute writes to.
    #[must_use]
    pub const fn actor_id(&self) -> Option<Uuid> {
        self.user_id
    }
}

/// Reasons a context could not be resolved.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("No session")]
    NoSession,

    #[error("Session subject is not a user id")]
    InvalidSubject,

    #[error("Unknown or deactivated identity")]
    UnknownIdentity,

    #[error("Invalid impersonation: {0}")]
    InvalidImpersonation(&'static str),

    #[error("Identity provider failure: {0}")]
    Provider(#[from] IdentityError),
}

impl From<ContextError> for AccessError {
    fn from(err: ContextError) -> Self {
        Self::ContextUnavailable(err.to_string())
    }
}

/// Derives [`ExecutionContext`] values from sessions.
#[derive(Clone)]
pub struct ContextResolver {
    identities: Arc<dyn IdentityProvider>,
}

impl ContextResolver {
    #[must_use]
    pub fn new(identities: Arc<dyn IdentityProvider>) -> Self {
        Self { identities }
    }

    /// Resolve the context for a validated session.
    ///
    /// An act-as claim is honoured only while the underlying identity is
    /// still Super-Admin and the claim names the token subject.
    pub async fn resolve(
        &self,
        session: Option<&Claims>,
    ) -> Result<ExecutionContext, ContextError> {
        let claims = session.ok_or(ContextError::NoSession)?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| ContextError::InvalidSubject)?;

        let identity = self
            .identities
            .find_identity(user_id)
            .await?
            .ok_or(ContextError::UnknownIdentity)?;

        let Some(act) = &claims.act else {
            return Ok(ExecutionContext::from_identity(identity));
        };

        if identity.role != Role::SuperAdmin.as_str() {
            return Err(ContextError::InvalidImpersonation(
                "underlying identity is not Super-Admin",
            ));
        }
        if act.original_sub != claims.sub {
            return Err(ContextError::InvalidImpersonation(
                "original subject does not match token subject",
            ));
        }
        match Role::from_str(&act.role) {
            Ok(Role::SuperAdmin) => {
                return Err(ContextError::InvalidImpersonation(
                    "cannot impersonate Super-Admin",
                ));
            }
            Ok(_) => {}
            Err(_) => return Err(ContextError::InvalidImpersonation("unknown role")),
        }

        Ok(ExecutionContext {
            role: act.role.clone(),
            club_id: act.club_id,
            user_id: Some(identity.user_id),
            email: identity.email.clone(),
            impersonator: Some(identity),
        })
    }
}

/// Extractor for the context inserted by [`require_context`](super::require_context).
impl<S> FromRequestParts<S> for ExecutionContext
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AccessError::ContextUnavailable("no context on request".into()))
    }
}
