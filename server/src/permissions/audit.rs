//! Audit trail for permission and impersonation changes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{AuditLogEntry, NewAuditEntry};
use super::queries;

/// Action names written to the audit log.
pub mod actions {
    pub const OVERRIDES_SAVED: &str = "permissions.overrides.saved";
    pub const ROLE_RESET: &str = "permissions.role.reset";
    pub const IMPERSONATION_STARTED: &str = "auth.impersonation.started";
    pub const IMPERSONATION_ENDED: &str = "auth.impersonation.ended";
}

/// Destination for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> sqlx::Result<AuditLogEntry>;

    /// Most recent entries first, optionally filtered by action prefix.
    async fn recent(
        &self,
        limit: i64,
        offset: i64,
        action_filter: Option<&str>,
    ) -> sqlx::Result<Vec<AuditLogEntry>>;
}

/// Audit sink writing to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    #[tracing::instrument(skip(self, entry), fields(action = %entry.action))]
    async fn record(&self, entry: NewAuditEntry) -> sqlx::Result<AuditLogEntry> {
        queries::write_audit_log(&self.pool, &entry).await
    }

    #[tracing::instrument(skip(self))]
    async fn recent(
        &self,
        limit: i64,
        offset: i64,
        action_filter: Option<&str>,
    ) -> sqlx::Result<Vec<AuditLogEntry>> {
        queries::get_audit_log(&self.pool, limit, offset, action_filter).await
    }
}

/// In-memory audit sink.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in write order.
    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: NewAuditEntry) -> sqlx::Result<AuditLogEntry> {
        let stored = AuditLogEntry {
            id: Uuid::now_v7(),
            actor_id: entry.actor_id,
            action: entry.action,
            target_type: entry.target_type,
            target_id: entry.target_id,
            details: entry.details,
            created_at: Utc::now(),
        };
        self.entries.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn recent(
        &self,
        limit: i64,
        offset: i64,
        action_filter: Option<&str>,
    ) -> sqlx::Result<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| action_filter.is_none_or(|prefix| e.action.starts_with(prefix)))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
