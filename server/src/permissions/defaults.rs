//! Role registry and the compiled-in default permission matrix.
//!
//! Rows are fixed-size arrays indexed by [`module_order`](super::modules::module_order),
//! so adding a module without extending every row fails to compile.

use std::str::FromStr;

use kader_common::{PermissionLevel, Role};

use super::models::OverrideRow;
use super::modules::{module_index, MODULES, MODULE_COUNT};

const V: PermissionLevel = PermissionLevel::Full;
const L: PermissionLevel = PermissionLevel::Limited;
const K: PermissionLevel = PermissionLevel::None;

/// One default row per role.
pub type DefaultRow = [PermissionLevel; MODULE_COUNT];

// Columns:
//  0 Dashboard          1 Club Profile       2 Teams              3 Player Management
//  4 Training Planning  5 Language Settings  6 Chat               7 Calendar
//  8 Match Center       9 Medical Center    10 Scouting          11 Referrals
// 12 Sponsoring        13 Investor Relations 14 Finances         15 Facilities
// 16 Shop              17 Marketing         18 Documents         19 Referee Assignments
// 20 Roles & Rights
#[rustfmt::skip]
pub const DEFAULT_MATRIX: &[(Role, DefaultRow)] = &[
    (Role::SuperAdmin,      [V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V]),
    (Role::ClubAdmin,       [V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, V, L, L]),
    (Role::Manager,         [V, L, V, V, V, L, V, V, V, L, V, V, L, K, L, L, L, L, V, K, K]),
    (Role::Coach,           [V, L, V, L, V, L, V, V, V, L, L, L, K, K, K, L, K, K, L, K, K]),
    (Role::Player,          [L, L, L, K, L, L, V, L, L, L, K, K, K, K, K, K, L, K, L, K, K]),
    (Role::Parent,          [L, L, L, K, L, L, V, L, L, L, K, K, K, K, L, K, L, K, L, K, K]),
    (Role::Sponsor,         [L, L, K, K, K, L, V, L, L, K, K, K, V, K, K, K, L, L, L, K, K]),
    (Role::Investor,        [L, L, K, K, K, L, V, L, L, K, K, K, L, V, L, K, K, K, L, K, K]),
    (Role::Referee,         [L, K, K, K, K, L, V, L, L, K, K, K, K, K, K, K, K, K, L, V, K]),
    (Role::Federation,      [L, L, L, L, K, L, V, L, V, K, L, K, K, K, K, K, K, K, V, V, K]),
    (Role::Scouting,        [L, L, L, L, K, L, V, L, L, K, V, V, K, K, K, K, K, K, L, K, K]),
    (Role::Supplier,        [L, L, K, K, K, L, V, L, K, K, K, K, K, K, K, L, V, K, L, K, K]),
    (Role::Fan,             [L, L, L, K, K, L, L, L, L, K, K, K, K, K, K, K, L, K, K, K, K]),
    (Role::Marketing,       [V, L, L, L, K, L, V, V, L, K, K, K, V, K, K, K, V, V, V, K, K]),
    (Role::Board,           [V, V, L, L, L, L, V, V, L, L, L, L, V, V, V, L, L, L, V, K, L]),
    (Role::FacilityManager, [L, L, L, K, L, L, V, V, L, K, K, K, K, K, L, V, K, K, L, K, K]),
    (Role::ProviderMedical, [L, K, L, L, L, L, V, L, L, V, K, K, K, K, K, K, K, K, L, K, K]),
    (Role::ProviderFitness, [L, K, L, L, V, L, V, L, L, L, K, K, K, K, K, L, K, K, L, K, K]),
    (Role::ProviderTravel,  [L, K, L, K, K, L, V, V, L, K, K, K, K, K, K, K, K, K, L, K, K]),
];

/// The closed set of roles.
#[must_use]
pub const fn roles() -> &'static [Role] {
    Role::all()
}

/// Compiled-in row for a role.
#[must_use]
pub fn default_levels(role: Role) -> Option<&'static DefaultRow> {
    DEFAULT_MATRIX
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, row)| row)
}

/// Default level of `role` on `module`.
///
/// Unknown roles, unknown modules and missing row entries all resolve to
/// [`PermissionLevel::None`].
#[must_use]
pub fn default_permission(role: &str, module: &str) -> PermissionLevel {
    let Ok(role) = Role::from_str(role) else {
        return PermissionLevel::None;
    };
    let Some(index) = module_index(module) else {
        return PermissionLevel::None;
    };
    match default_levels(role).and_then(|row| row.get(index)) {
        Some(level) => *level,
        None => PermissionLevel::None,
    }
}

/// Default row of a role keyed by module name.
#[must_use]
pub fn default_row(role: Role) -> OverrideRow {
    let mut row = OverrideRow::new();
    if let Some(levels) = default_levels(role) {
        for (module, level) in MODULES.iter().zip(levels.iter()) {
            row.set(module.name, *level);
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::modules::{
        module_order, LANGUAGE_SETTINGS, REFERRALS, ROLES_AND_RIGHTS,
    };

    #[test]
    fn test_every_role_has_exactly_one_row() {
        for role in roles() {
            let rows = DEFAULT_MATRIX.iter().filter(|(r, _)| r == role).count();
            assert_eq!(rows, 1, "{role} must have exactly one default row");
        }
        assert_eq!(DEFAULT_MATRIX.len(), roles().len());
    }

    #[test]
    fn test_super_admin_has_full_access_everywhere() {
        for module in module_order() {
            assert_eq!(
                default_permission("Super-Admin", module),
                PermissionLevel::Full,
                "{module}"
            );
        }
    }

    #[test]
    fn test_only_super_admin_manages_roles_and_rights() {
        for role in roles() {
            let level = default_permission(role.as_str(), ROLES_AND_RIGHTS);
            if *role == Role::SuperAdmin {
                assert_eq!(level, PermissionLevel::Full);
            } else {
                assert!(level < PermissionLevel::Full, "{role} must not edit the matrix");
            }
        }
    }

    #[test]
    fn test_coach_has_limited_referrals() {
        assert_eq!(
            default_permission("Coach", REFERRALS),
            PermissionLevel::Limited
        );
    }

    #[test]
    fn test_club_admin_has_full_language_settings() {
        assert_eq!(
            default_permission("Club-Admin", LANGUAGE_SETTINGS),
            PermissionLevel::Full
        );
    }

    #[test]
    fn test_unknown_inputs_fail_closed() {
        assert_eq!(
            default_permission("Super-Admin", "NonexistentModule"),
            PermissionLevel::None
        );
        assert_eq!(
            default_permission("Janitor", REFERRALS),
            PermissionLevel::None
        );
        assert_eq!(default_permission("", ""), PermissionLevel::None);
        assert_eq!(
            default_permission("super-admin", REFERRALS),
            PermissionLevel::None
        );
    }

    #[test]
    fn test_default_row_matches_positional_levels() {
        for role in roles() {
            let row = default_row(*role);
            assert_eq!(row.len(), MODULE_COUNT);
            for module in module_order() {
                assert_eq!(
                    row.get(module),
                    Some(default_permission(role.as_str(), module))
                );
            }
        }
    }
}
