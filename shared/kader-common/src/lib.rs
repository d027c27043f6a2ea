//! Kader Common Library
//!
//! Shared types used by the server and the web client: roles, permission
//! levels and navigation metadata.

pub mod error;
pub mod types;

pub use error::ParseError;
pub use types::*;
