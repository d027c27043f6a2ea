//! Admin module types.

use std::collections::BTreeMap;

use kader_common::{ModuleInfo, PermissionLevel, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::{
    default_permission, modules, AccessEvaluator, OverrideMatrix, OverrideRow,
};

/// Caller allowed to manage roles and rights.
#[derive(Debug, Clone)]
pub struct RightsAdmin {
    pub user_id: Option<Uuid>,
}

/// One cell of the permission grid.
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub module: &'static str,
    pub effective: PermissionLevel,
    pub default: PermissionLevel,
}

/// One role's row of the permission grid.
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub role: &'static str,
    /// Whether an override row governs this role.
    pub overridden: bool,
    pub levels: Vec<GridCell>,
}

/// Response for `GET /api/admin/permissions`.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionGridResponse {
    pub modules: &'static [ModuleInfo],
    pub roles: Vec<GridRow>,
}

impl PermissionGridResponse {
    /// Build the grid for every role over the given overrides.
    #[must_use]
    pub fn build(overrides: OverrideMatrix) -> Self {
        let evaluator = AccessEvaluator::new(overrides);
        let roles = Role::all()
            .iter()
            .map(|role| {
                let role = role.as_str();
                GridRow {
                    role,
                    overridden: evaluator.is_overridden(role),
                    levels: modules()
                        .iter()
                        .map(|module| GridCell {
                            module: module.name,
                            effective: evaluator.effective_permission(role, module.name),
                            default: default_permission(role, module.name),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            modules: modules(),
            roles,
        }
    }
}

/// Request body for `PUT /api/admin/permissions`.
///
/// Each listed role's row replaces its stored row. Roles not listed keep
/// their current state.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub roles: BTreeMap<String, BTreeMap<String, PermissionLevel>>,
}

impl UpdatePermissionsRequest {
    #[must_use]
    pub fn into_matrix(self) -> OverrideMatrix {
        self.roles
            .into_iter()
            .map(|(role, levels)| (role, levels.into_iter().collect::<OverrideRow>()))
            .collect()
    }
}

/// Response for `PUT /api/admin/permissions`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePermissionsResponse {
    /// Roles whose rows were written.
    pub saved: Vec<String>,
    /// Grid after the save. Absent when it could not be reloaded.
    #[serde(flatten)]
    pub grid: Option<PermissionGridResponse>,
}

/// Response for `DELETE /api/admin/permissions/{role}`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetRoleResponse {
    pub role: String,
    /// Whether an override row existed.
    pub reset: bool,
}
