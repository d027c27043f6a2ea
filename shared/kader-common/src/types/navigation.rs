//! Module and Navigation Types

use serde::Serialize;

/// A functional area of the application gated by the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Stable module name.
    pub name: &'static str,
    /// Human-readable description shown in the settings grid.
    pub description: &'static str,
}

/// Menu entry in the web client.
///
/// Entries only decide what is rendered. Every operation behind a path
/// performs its own permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Client route.
    pub path: &'static str,
    /// Module the entry belongs to.
    pub module: &'static str,
    /// Menu label.
    pub label: &'static str,
}
