//! Database queries for the permission system.
//!
//! Provides async functions for managing:
//! - Role permission overrides
//! - Audit logging

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::models::{AuditLogEntry, NewAuditEntry, RoleOverrideRecord, StoredRow};

// ============================================================================
// Override Queries
// ============================================================================

/// List all stored override rows.
pub async fn list_role_overrides(pool: &PgPool) -> sqlx::Result<Vec<RoleOverrideRecord>> {
    sqlx::query_as::<_, RoleOverrideRecord>(
        r"
        SELECT role, levels, updated_by, updated_at
        FROM role_permission_overrides
        ORDER BY role ASC
        ",
    )
    .fetch_all(pool)
    .await
}

/// Get the stored override row of a role.
pub async fn get_role_override(
    pool: &PgPool,
    role: &str,
) -> sqlx::Result<Option<RoleOverrideRecord>> {
    sqlx::query_as::<_, RoleOverrideRecord>(
        r"
        SELECT role, levels, updated_by, updated_at
        FROM role_permission_overrides
        WHERE role = $1
        ",
    )
    .bind(role)
    .fetch_optional(pool)
    .await
}

/// Insert or replace the override row of a role.
///
/// The whole row is written; concurrent writers for the same role resolve to
/// the last completed write.
pub async fn upsert_role_override(
    pool: &PgPool,
    role: &str,
    levels: &StoredRow,
    updated_by: Option<Uuid>,
) -> sqlx::Result<RoleOverrideRecord> {
    sqlx::query_as::<_, RoleOverrideRecord>(
        r"
        INSERT INTO role_permission_overrides (role, levels, updated_by, updated_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (role) DO UPDATE
        SET levels = EXCLUDED.levels,
            updated_by = EXCLUDED.updated_by,
            updated_at = NOW()
        RETURNING role, levels, updated_by, updated_at
        ",
    )
    .bind(role)
    .bind(Json(levels))
    .bind(updated_by)
    .fetch_one(pool)
    .await
}

/// Delete the override row of a role.
///
/// Returns `true` if a row was removed.
pub async fn delete_role_override(pool: &PgPool, role: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM role_permission_overrides WHERE role = $1")
        .bind(role)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Audit Log Queries
// ============================================================================

/// Write an entry to the audit log.
pub async fn write_audit_log(pool: &PgPool, entry: &NewAuditEntry) -> sqlx::Result<AuditLogEntry> {
    sqlx::query_as::<_, AuditLogEntry>(
        r"
        INSERT INTO audit_log (id, actor_id, action, target_type, target_id, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, actor_id, action, target_type, target_id, details, created_at
        ",
    )
    .bind(Uuid::now_v7())
    .bind(entry.actor_id)
    .bind(&entry.action)
    .bind(entry.target_type.as_deref())
    .bind(entry.target_id.as_deref())
    .bind(entry.details.clone())
    .fetch_one(pool)
    .await
}

/// Turn an action prefix into a `LIKE` pattern, escaping the wildcards it contains.
fn like_prefix(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 1);
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Get audit log entries with pagination and optional action filter.
///
/// If `action_filter` is provided, only actions starting with that literal prefix are returned.
pub async fn get_audit_log(
    pool: &PgPool,
    limit: i64,
    offset: i64,
    action_filter: Option<&str>,
) -> sqlx::Result<Vec<AuditLogEntry>> {
    let pattern = action_filter.map(like_prefix);
    sqlx::query_as::<_, AuditLogEntry>(
        r"
        SELECT id, actor_id, action, target_type, target_id, details, created_at
        FROM audit_log
        WHERE ($1::text IS NULL OR action LIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("permissions."), "permissions.%");
        assert_eq!(like_prefix("permissions._x"), r"permissions.\_x%");
        assert_eq!(like_prefix("100%"), r"100\%%");
        assert_eq!(like_prefix(r"a\b"), r"a\\b%");
    }
}
