//! Access evaluation.
//!
//! Pure functions over the default matrix and an override snapshot. No I/O,
//! no logging; callers log denials at the operation boundary.

use kader_common::{NavigationEntry, PermissionLevel};
use serde::Serialize;

use super::defaults::default_permission;
use super::error::{AccessError, AccessResult};
use super::models::OverrideMatrix;
use super::modules::{is_known_module, module_description, module_order, navigation_entries};
use crate::auth::ExecutionContext;

/// Effective level of one module for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePermission {
    pub module: &'static str,
    pub description: &'static str,
    pub level: PermissionLevel,
}

/// Answers "may this role use this module, and how much".
#[derive(Debug, Clone, Default)]
pub struct AccessEvaluator {
    overrides: OverrideMatrix,
}

impl AccessEvaluator {
    #[must_use]
    pub const fn new(overrides: OverrideMatrix) -> Self {
        Self { overrides }
    }

    /// Evaluator without any overrides.
    #[must_use]
    pub fn defaults_only() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn overrides(&self) -> &OverrideMatrix {
        &self.overrides
    }

    /// Effective level of `role` on `module`.
    ///
    /// A role with an override row is governed entirely by that row: a module
    /// missing from it resolves to `None`. Unknown modules are always `None`.
    #[must_use]
    pub fn effective_permission(&self, role: &str, module: &str) -> PermissionLevel {
        if !is_known_module(module) {
            return PermissionLevel::None;
        }
        match self.overrides.row(role) {
            Some(row) => row.get(module).unwrap_or(PermissionLevel::None),
            None => default_permission(role, module),
        }
    }

    #[must_use]
    pub fn has_module_access(&self, role: &str, module: &str) -> bool {
        self.effective_permission(role, module).grants_access()
    }

    #[must_use]
    pub fn has_at_least(&self, role: &str, module: &str, level: PermissionLevel) -> bool {
        self.effective_permission(role, module).satisfies(level)
    }

    /// Whether the role's level comes from an override row.
    #[must_use]
    pub fn is_overridden(&self, role: &str) -> bool {
        self.overrides.contains_role(role)
    }

    /// Require any access to `module`. Returns the effective level.
    pub fn require_module_access(
        &self,
        ctx: Option<&ExecutionContext>,
        module: &str,
    ) -> AccessResult<PermissionLevel> {
        self.require_at_least(ctx, module, PermissionLevel::Limited)
    }

    /// Require at least `level` on `module`. Returns the effective level.
    pub fn require_at_least(
        &self,
        ctx: Option<&ExecutionContext>,
        module: &str,
        level: PermissionLevel,
    ) -> AccessResult<PermissionLevel> {
        let ctx = ctx.ok_or_else(|| AccessError::ContextUnavailable("no context".into()))?;
        let effective = self.effective_permission(&ctx.role, module);
        if effective.grants_access() && effective.satisfies(level) {
            Ok(effective)
        } else {
            Err(AccessError::denied(module))
        }
    }

    /// Effective levels of `role` for every module, in module order.
    #[must_use]
    pub fn permission_row(&self, role: &str) -> Vec<ModulePermission> {
        module_order()
            .map(|module| ModulePermission {
                module,
                description: module_description(module),
                level: self.effective_permission(role, module),
            })
            .collect()
    }

    /// Navigation entries whose module the role can access.
    ///
    /// Display only. Operations enforce access themselves.
    #[must_use]
    pub fn visible_navigation(&self, role: &str) -> Vec<&'static NavigationEntry> {
        navigation_entries()
            .iter()
            .filter(|entry| self.has_module_access(role, entry.module))
            .collect()
    }
}
