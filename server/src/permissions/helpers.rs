//! Permission helper functions for API handlers.
//!
//! Wraps the evaluator checks with the server-side denial log. The client
//! only ever sees the generic denial.

use kader_common::PermissionLevel;
use uuid::Uuid;

use super::error::{AccessError, AccessResult};
use super::evaluator::AccessEvaluator;
use crate::auth::ExecutionContext;

/// Require at least `level` on `module` for the request's context.
///
/// Returns the effective level so handlers can narrow what a `Limited`
/// caller sees.
///
/// # Example
///
/// ```ignore
/// let evaluator = state.permissions.evaluator().await;
/// let level = require_module_level(&evaluator, &ctx, REFERRALS, PermissionLevel::Limited)?;
/// if level == PermissionLevel::Full {
///     // unrestricted listing
/// }
/// ```
pub fn require_module_level(
    evaluator: &AccessEvaluator,
    ctx: &ExecutionContext,
    module: &str,
    level: PermissionLevel,
) -> AccessResult<PermissionLevel> {
    evaluator
        .require_at_least(Some(ctx), module, level)
        .inspect_err(|_| {
            tracing::info!(
                role = %ctx.role,
                user_id = ?ctx.user_id,
                impersonating = ctx.is_impersonating(),
                module,
                required = %level,
                "Access denied"
            );
        })
}

/// Require that the context may act on `club_id`.
pub fn require_club_scope(ctx: &ExecutionContext, club_id: Uuid) -> AccessResult<()> {
    if ctx.can_access_club(club_id) {
        Ok(())
    } else {
        tracing::info!(
            role = %ctx.role,
            user_id = ?ctx.user_id,
            club_id = %club_id,
            "Access denied: club outside scope"
        );
        Err(AccessError::OutOfScope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::modules::{MEDICAL_CENTER, REFERRALS};

    fn ctx(role: &str, club_id: Option<Uuid>) -> ExecutionContext {
        ExecutionContext {
            role: role.into(),
            club_id,
            user_id: Some(Uuid::new_v4()),
            email: None,
            impersonator: None,
        }
    }

    #[test]
    fn test_require_module_level() {
        let evaluator = AccessEvaluator::defaults_only();
        let coach = ctx("Coach", None);

        assert_eq!(
            require_module_level(&evaluator, &coach, REFERRALS, PermissionLevel::Limited).unwrap(),
            PermissionLevel::Limited
        );
        assert!(matches!(
            require_module_level(&evaluator, &coach, REFERRALS, PermissionLevel::Full),
            Err(AccessError::AccessDenied { .. })
        ));
        assert!(require_module_level(
            &evaluator,
            &ctx("Sponsor", None),
            MEDICAL_CENTER,
            PermissionLevel::Limited
        )
        .is_err());
    }

    #[test]
    fn test_require_club_scope() {
        let club = Uuid::new_v4();

        assert!(require_club_scope(&ctx("Coach", Some(club)), club).is_ok());
        assert!(matches!(
            require_club_scope(&ctx("Coach", Some(club)), Uuid::new_v4()),
            Err(AccessError::OutOfScope)
        ));
        assert!(require_club_scope(&ctx("Super-Admin", None), club).is_ok());
    }
}
