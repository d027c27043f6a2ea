//! Override persistence.
//!
//! Stores return rows as found after decoding; validation and normalization
//! happen in [`PermissionService`](super::PermissionService).

use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::models::{OverrideMatrix, OverrideRow, StoredRow};
use super::queries;

/// Override store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row could not be decoded.
    #[error("Malformed override row for role {role}: {reason}")]
    Serialization { role: String, reason: String },

    /// Store could not be reached.
    #[error("Override store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent store of administrator overrides.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Load every stored row.
    async fn load_all(&self) -> Result<OverrideMatrix, StoreError>;

    /// Load the row of one role.
    async fn load_role(&self, role: &str) -> Result<Option<OverrideRow>, StoreError>;

    /// Replace the row of one role.
    async fn save_role(
        &self,
        role: &str,
        row: &OverrideRow,
        actor: Option<Uuid>,
    ) -> Result<(), StoreError>;

    /// Delete the row of one role. Returns `true` if a row existed.
    async fn delete_role(&self, role: &str) -> Result<bool, StoreError>;
}

/// Decode a stored row, converting the legacy positional layout.
fn decode_row(role: &str, stored: StoredRow) -> OverrideRow {
    let positional = stored.is_positional();
    let (row, dropped) = stored.into_row();
    if positional {
        tracing::info!(role, modules = row.len(), "Converted positional override row");
    }
    if dropped > 0 {
        tracing::warn!(role, dropped, "Dropped positional entries beyond registered modules");
    }
    row
}

// ============================================================================
// Postgres
// ============================================================================

/// Override store backed by `role_permission_overrides`.
#[derive(Debug, Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A JSONB value that matches neither layout surfaces as a decode error.
fn map_decode_error(role: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { source, .. } => StoreError::Serialization {
            role: role.to_string(),
            reason: source.to_string(),
        },
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    #[tracing::instrument(skip(self))]
    async fn load_all(&self) -> Result<OverrideMatrix, StoreError> {
        let records = queries::list_role_overrides(&self.pool)
            .await
            .map_err(|e| map_decode_error("*", e))?;

        Ok(records
            .into_iter()
            .map(|record| {
                let row = decode_row(&record.role, record.levels.0);
                (record.role, row)
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn load_role(&self, role: &str) -> Result<Option<OverrideRow>, StoreError> {
        let record = queries::get_role_override(&self.pool, role)
            .await
            .map_err(|e| map_decode_error(role, e))?;

        Ok(record.map(|record| decode_row(role, record.levels.0)))
    }

    #[tracing::instrument(skip(self, row))]
    async fn save_role(
        &self,
        role: &str,
        row: &OverrideRow,
        actor: Option<Uuid>,
    ) -> Result<(), StoreError> {
        queries::upsert_role_override(&self.pool, role, &StoredRow::from(row), actor).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_role(&self, role: &str) -> Result<bool, StoreError> {
        Ok(queries::delete_role_override(&self.pool, role).await?)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Stored row with write metadata.
#[derive(Debug, Clone)]
struct MemoryRecord {
    levels: serde_json::Value,
    updated_by: Option<Uuid>,
}

/// In-memory override store for tests and embedding.
///
/// Rows are kept as JSON so raw legacy or malformed rows can be seeded.
#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    rows: DashMap<String, MemoryRecord>,
}

impl MemoryPermissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw stored row, bypassing validation.
    pub fn insert_raw(&self, role: &str, levels: serde_json::Value) {
        self.rows.insert(
            role.to_string(),
            MemoryRecord {
                levels,
                updated_by: None,
            },
        );
    }

    /// Raw stored value of a role.
    #[must_use]
    pub fn raw(&self, role: &str) -> Option<serde_json::Value> {
        self.rows.get(role).map(|record| record.levels.clone())
    }

    /// Who last wrote the row of a role.
    #[must_use]
    pub fn updated_by(&self, role: &str) -> Option<Uuid> {
        self.rows.get(role).and_then(|record| record.updated_by)
    }

    fn decode(role: &str, record: &MemoryRecord) -> Result<OverrideRow, StoreError> {
        let stored: StoredRow = serde_json::from_value(record.levels.clone()).map_err(|e| {
            StoreError::Serialization {
                role: role.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(decode_row(role, stored))
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn load_all(&self) -> Result<OverrideMatrix, StoreError> {
        let mut matrix = OverrideMatrix::new();
        for entry in &self.rows {
            let row = Self::decode(entry.key(), entry.value())?;
            matrix.insert(entry.key().clone(), row);
        }
        Ok(matrix)
    }

    async fn load_role(&self, role: &str) -> Result<Option<OverrideRow>, StoreError> {
        self.rows
            .get(role)
            .map(|record| Self::decode(role, &record))
            .transpose()
    }

    async fn save_role(
        &self,
        role: &str,
        row: &OverrideRow,
        actor: Option<Uuid>,
    ) -> Result<(), StoreError> {
        let levels = serde_json::to_value(StoredRow::from(row)).map_err(|e| {
            StoreError::Serialization {
                role: role.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.rows.insert(
            role.to_string(),
            MemoryRecord {
                levels,
                updated_by: actor,
            },
        );
        Ok(())
    }

    async fn delete_role(&self, role: &str) -> Result<bool, StoreError> {
        Ok(self.rows.remove(role).is_some())
    }
}
