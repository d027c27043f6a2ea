//! Shared Types

mod navigation;
mod permission;
mod role;

pub use navigation::{ModuleInfo, NavigationEntry};
pub use permission::PermissionLevel;
pub use role::Role;
