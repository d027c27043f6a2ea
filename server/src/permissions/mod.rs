//! Role and module permission system.
//!
//! Access to every functional module is decided by the role's level on that
//! module:
//! - Defaults: compiled-in matrix, one row per role
//! - Overrides: administrator rows persisted per role, authoritative when present

pub mod audit;
pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod helpers;
pub mod models;
pub mod modules;
pub mod queries;
pub mod service;
pub mod store;

pub use audit::{AuditSink, MemoryAuditSink, PgAuditSink};
pub use defaults::{default_permission, default_row, roles};
pub use error::{AccessError, AccessResult, ErrorResponse, ACCESS_DENIED_CODE};
pub use evaluator::{AccessEvaluator, ModulePermission};
pub use helpers::{require_club_scope, require_module_level};
pub use models::*;
pub use modules::{
    module_description, module_index, module_order, modules, navigation_entries, MODULE_COUNT,
};
pub use service::{PermissionService, SaveFailure};
pub use store::{MemoryPermissionStore, PermissionStore, PgPermissionStore, StoreError};
