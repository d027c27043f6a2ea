//! Override matrix types and database records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kader_common::PermissionLevel;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::modules::{is_known_module, MODULES};

/// One role's override row, keyed by module name.
///
/// A row is authoritative for its role: modules missing from the row resolve
/// to [`PermissionLevel::None`], not to the compiled-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideRow(BTreeMap<String, PermissionLevel>);

impl OverrideRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from the legacy positional layout (indexed by module order).
    ///
    /// Entries beyond the registered modules are dropped; their count is
    /// returned alongside the row.
    #[must_use]
    pub fn from_positional(levels: &[PermissionLevel]) -> (Self, usize) {
        let row = MODULES
            .iter()
            .zip(levels.iter())
            .map(|(module, level)| (module.name.to_string(), *level))
            .collect();
        let dropped = levels.len().saturating_sub(MODULES.len());
        (Self(row), dropped)
    }

    pub fn set(&mut self, module: impl Into<String>, level: PermissionLevel) {
        self.0.insert(module.into(), level);
    }

    #[must_use]
    pub fn get(&self, module: &str) -> Option<PermissionLevel> {
        self.0.get(module).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PermissionLevel)> {
        self.0.iter().map(|(module, level)| (module.as_str(), *level))
    }

    /// Modules in this row that are not registered.
    #[must_use]
    pub fn unknown_modules(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|m| !is_known_module(m))
            .map(String::as_str)
            .collect()
    }

    /// Remove unregistered modules, returning their names.
    pub fn retain_known_modules(&mut self) -> Vec<String> {
        let unknown: Vec<String> = self
            .unknown_modules()
            .into_iter()
            .map(str::to_string)
            .collect();
        for module in &unknown {
            self.0.remove(module);
        }
        unknown
    }
}

impl FromIterator<(String, PermissionLevel)> for OverrideRow {
    fn from_iter<I: IntoIterator<Item = (String, PermissionLevel)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Administrator overrides: role name to override row.
///
/// May cover only some roles. Roles without a row use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMatrix(BTreeMap<String, OverrideRow>);

impl OverrideMatrix {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<String>, row: OverrideRow) {
        self.0.insert(role.into(), row);
    }

    #[must_use]
    pub fn row(&self, role: &str) -> Option<&OverrideRow> {
        self.0.get(role)
    }

    #[must_use]
    pub fn contains_role(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideRow)> {
        self.0.iter().map(|(role, row)| (role.as_str(), row))
    }
}

impl FromIterator<(String, OverrideRow)> for OverrideMatrix {
    fn from_iter<I: IntoIterator<Item = (String, OverrideRow)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Row as found in storage.
///
/// Rows written before overrides were keyed by module name are JSON arrays
/// indexed by module order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRow {
    Named(BTreeMap<String, PermissionLevel>),
    Positional(Vec<PermissionLevel>),
}

impl StoredRow {
    /// Whether this row uses the legacy positional layout.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        matches!(self, Self::Positional(_))
    }

    /// Convert to the named layout. Returns the row and the number of
    /// positional entries that had no registered module.
    #[must_use]
    pub fn into_row(self) -> (OverrideRow, usize) {
        match self {
            Self::Named(levels) => (OverrideRow(levels), 0),
            Self::Positional(levels) => OverrideRow::from_positional(&levels),
        }
    }
}

impl From<&OverrideRow> for StoredRow {
    fn from(row: &OverrideRow) -> Self {
        Self::Named(row.0.clone())
    }
}

/// Persisted override record.
#[derive(Debug, Clone, FromRow)]
pub struct RoleOverrideRecord {
    pub role: String,
    pub levels: sqlx::types::Json<StoredRow>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit log entry before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAuditEntry {
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl NewAuditEntry {
    #[must_use]
    pub fn new(actor_id: Option<Uuid>, action: impl Into<String>) -> Self {
        Self {
            actor_id,
            action: action.into(),
            target_type: None,
            target_id: None,
            details: None,
        }
    }

    #[must_use]
    pub fn target(mut self, target_type: &str, target_id: impl Into<String>) -> Self {
        self.target_type = Some(target_type.to_string());
        self.target_id = Some(target_id.into());
        self
    }

    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::modules::{CHAT, DASHBOARD, MODULE_COUNT};

    #[test]
    fn test_positional_row_maps_by_module_order() {
        let (row, dropped) = OverrideRow::from_positional(&[
            PermissionLevel::Full,
            PermissionLevel::None,
            PermissionLevel::Limited,
        ]);

        assert_eq!(dropped, 0);
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(DASHBOARD), Some(PermissionLevel::Full));
        assert_eq!(row.get("Club Profile"), Some(PermissionLevel::None));
        assert_eq!(row.get("Teams"), Some(PermissionLevel::Limited));
        // Missing trailing entries are absent, not defaulted
        assert_eq!(row.get(CHAT), None);
    }

    #[test]
    fn test_positional_row_drops_extra_entries() {
        let levels = vec![PermissionLevel::Limited; MODULE_COUNT + 2];
        let (row, dropped) = OverrideRow::from_positional(&levels);

        assert_eq!(row.len(), MODULE_COUNT);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_stored_row_accepts_both_layouts() {
        let named: StoredRow =
            serde_json::from_str(r#"{"Chat":"Voll","Dashboard":"Kein"}"#).unwrap();
        assert!(!named.is_positional());
        let (row, _) = named.into_row();
        assert_eq!(row.get(CHAT), Some(PermissionLevel::Full));
        assert_eq!(row.get(DASHBOARD), Some(PermissionLevel::None));

        let positional: StoredRow = serde_json::from_str(r#"["Limit","Voll"]"#).unwrap();
        assert!(positional.is_positional());
        let (row, _) = positional.into_row();
        assert_eq!(row.get(DASHBOARD), Some(PermissionLevel::Limited));
    }

    #[test]
    fn test_stored_row_rejects_unknown_level() {
        assert!(serde_json::from_str::<StoredRow>(r#"{"Chat":"Maybe"}"#).is_err());
    }

    #[test]
    fn test_stored_row_is_written_named() {
        let mut row = OverrideRow::new();
        row.set(CHAT, PermissionLevel::Limited);

        let json = serde_json::to_value(StoredRow::from(&row)).unwrap();
        assert_eq!(json, serde_json::json!({"Chat": "Limit"}));
    }

    #[test]
    fn test_retain_known_modules() {
        let mut row = OverrideRow::new();
        row.set(CHAT, PermissionLevel::Full);
        row.set("Fax Machine", PermissionLevel::Full);

        assert_eq!(row.unknown_modules(), vec!["Fax Machine"]);
        let removed = row.retain_known_modules();
        assert_eq!(removed, vec!["Fax Machine".to_string()]);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_audit_entry_builder() {
        let actor = Uuid::new_v4();
        let entry = NewAuditEntry::new(Some(actor), "permissions.override.saved")
            .target("role", "Coach")
            .details(serde_json::json!({"modules": 3}));

        assert_eq!(entry.actor_id, Some(actor));
        assert_eq!(entry.target_type.as_deref(), Some("role"));
        assert_eq!(entry.target_id.as_deref(), Some("Coach"));
        assert!(entry.details.is_some());
    }
}
