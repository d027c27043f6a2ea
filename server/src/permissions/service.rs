//! Override administration and evaluator construction.

use std::str::FromStr;
use std::sync::Arc;

use kader_common::{PermissionLevel, Role};
use thiserror::Error;
use uuid::Uuid;

use super::error::{AccessError, AccessResult};
use super::evaluator::AccessEvaluator;
use super::models::OverrideMatrix;
use super::modules::ROLES_AND_RIGHTS;
use super::store::{PermissionStore, StoreError};

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        Self::ConfigurationUnavailable(err.to_string())
    }
}

/// A save of several rows that did not complete.
#[derive(Debug, Error)]
#[error("{error} (committed: {written:?})")]
pub struct SaveFailure {
    /// Roles whose rows were committed before the failure.
    pub written: Vec<String>,
    #[source]
    pub error: AccessError,
}

impl From<AccessError> for SaveFailure {
    fn from(error: AccessError) -> Self {
        Self {
            written: Vec::new(),
            error,
        }
    }
}

/// Reads and writes administrator overrides through a [`PermissionStore`].
#[derive(Clone)]
pub struct PermissionService {
    store: Arc<dyn PermissionStore>,
}

impl PermissionService {
    #[must_use]
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Load the stored overrides, normalized to known roles and modules.
    ///
    /// Fails with `ConfigurationUnavailable` when the store cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn load_overrides(&self) -> AccessResult<OverrideMatrix> {
        let stored = self.store.load_all().await?;
        Ok(normalize(&stored))
    }

    /// Evaluator over the current overrides.
    ///
    /// Falls back to the defaults when the store cannot be read.
    pub async fn evaluator(&self) -> AccessEvaluator {
        match self.load_overrides().await {
            Ok(overrides) => AccessEvaluator::new(overrides),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Permission overrides unavailable, evaluating with defaults"
                );
                AccessEvaluator::defaults_only()
            }
        }
    }

    /// Validate and persist overrides. Each role row in `matrix` replaces
    /// the stored row of that role; roles not in `matrix` are untouched.
    ///
    /// Rows are written one role at a time. On failure the returned
    /// [`SaveFailure`] names the roles already committed.
    ///
    /// Returns the roles written.
    #[tracing::instrument(skip(self, matrix), fields(roles = matrix.len()))]
    pub async fn save_overrides(
        &self,
        matrix: &OverrideMatrix,
        actor: Option<Uuid>,
    ) -> Result<Vec<String>, SaveFailure> {
        let current = if matrix.contains_role(Role::SuperAdmin.as_str()) {
            AccessEvaluator::new(self.load_overrides().await?)
        } else {
            AccessEvaluator::defaults_only()
        };
        validate(matrix, &current)?;

        let mut written = Vec::with_capacity(matrix.len());
        for (role, row) in matrix.iter() {
            if let Err(e) = self.store.save_role(role, row, actor).await {
                tracing::warn!(
                    error = %e,
                    role,
                    written = ?written,
                    "Override save stopped part way"
                );
                return Err(SaveFailure {
                    written,
                    error: e.into(),
                });
            }
            written.push(role.to_string());
        }

        tracing::info!(roles = ?written, actor = ?actor, "Saved permission overrides");
        Ok(written)
    }

    /// Remove the override row of a role, restoring its defaults.
    ///
    /// Returns `true` if a row was removed.
    #[tracing::instrument(skip(self))]
    pub async fn reset_role(&self, role: &str, actor: Option<Uuid>) -> AccessResult<bool> {
        if Role::from_str(role).is_err() {
            return Err(AccessError::Validation(format!("unknown role: {role}")));
        }

        let removed = self.store.delete_role(role).await?;
        if removed {
            tracing::info!(role, actor = ?actor, "Reset role to default permissions");
        }
        Ok(removed)
    }
}

/// Drop rows of unknown roles and entries of unknown modules.
#[must_use]
pub fn normalize(stored: &OverrideMatrix) -> OverrideMatrix {
    let mut normalized = OverrideMatrix::new();

    for (role, row) in stored.iter() {
        if Role::from_str(role).is_err() {
            tracing::warn!(role, "Ignoring override row for unknown role");
            continue;
        }

        let mut row = row.clone();
        let dropped = row.retain_known_modules();
        if !dropped.is_empty() {
            tracing::warn!(role, modules = ?dropped, "Ignoring overrides for unknown modules");
        }
        normalized.insert(role, row);
    }

    normalized
}

/// Reject overrides that name unknown roles or modules, or that would lower
/// Super-Admin's level on Roles & Rights below what `current` grants.
pub fn validate(matrix: &OverrideMatrix, current: &AccessEvaluator) -> AccessResult<()> {
    for (role, row) in matrix.iter() {
        let parsed = Role::from_str(role)
            .map_err(|_| AccessError::Validation(format!("unknown role: {role}")))?;

        if let Some(module) = row.unknown_modules().first() {
            return Err(AccessError::Validation(format!(
                "unknown module for {role}: {module}"
            )));
        }

        if parsed == Role::SuperAdmin {
            let requested = row.get(ROLES_AND_RIGHTS).unwrap_or(PermissionLevel::None);
            if requested < current.effective_permission(role, ROLES_AND_RIGHTS) {
                return Err(AccessError::Validation(format!(
                    "{role} must keep its access to {ROLES_AND_RIGHTS}"
                )));
            }
        }
    }
    Ok(())
}
