//! Permission Level

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Access level a role has on a module.
///
/// Variants are declared in capability order so the derived `Ord` gives
/// `None < Limited < Full`. Serialized with the identifiers the settings
/// grid has always stored: `Kein`, `Limit`, `Voll`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PermissionLevel {
    /// No access.
    #[default]
    #[serde(rename = "Kein")]
    None,
    /// Restricted access (typically read-only or own data).
    #[serde(rename = "Limit")]
    Limited,
    /// Unrestricted access.
    #[serde(rename = "Voll")]
    Full,
}

impl PermissionLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 3] = [Self::None, Self::Limited, Self::Full];

    /// Stored identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "Kein",
            Self::Limited => "Limit",
            Self::Full => "Voll",
        }
    }

    /// Whether this level grants any access at all.
    #[must_use]
    pub const fn grants_access(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether this level satisfies a required minimum.
    ///
    /// ```
    /// use kader_common::PermissionLevel;
    ///
    /// assert!(PermissionLevel::Full.satisfies(PermissionLevel::Limited));
    /// assert!(!PermissionLevel::Limited.satisfies(PermissionLevel::Full));
    /// ```
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Kein" => Ok(Self::None),
            "Limit" => Ok(Self::Limited),
            "Voll" => Ok(Self::Full),
            other => Err(ParseError::UnknownLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(PermissionLevel::None < PermissionLevel::Limited);
        assert!(PermissionLevel::Limited < PermissionLevel::Full);
        assert_eq!(
            PermissionLevel::ALL.iter().max(),
            Some(&PermissionLevel::Full)
        );
    }

    #[test]
    fn test_satisfies_uses_order_not_equality() {
        for have in PermissionLevel::ALL {
            for need in PermissionLevel::ALL {
                assert_eq!(have.satisfies(need), have >= need, "{have} vs {need}");
            }
        }
    }

    #[test]
    fn test_grants_access() {
        assert!(!PermissionLevel::None.grants_access());
        assert!(PermissionLevel::Limited.grants_access());
        assert!(PermissionLevel::Full.grants_access());
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(PermissionLevel::default(), PermissionLevel::None);
    }

    #[test]
    fn test_stored_identifiers() {
        assert_eq!(
            serde_json::to_string(&PermissionLevel::Full).unwrap(),
            "\"Voll\""
        );
        assert_eq!(
            serde_json::from_str::<PermissionLevel>("\"Limit\"").unwrap(),
            PermissionLevel::Limited
        );
        assert!(serde_json::from_str::<PermissionLevel>("\"voll\"").is_err());
        assert_eq!("Kein".parse(), Ok(PermissionLevel::None));
        assert!("Full".parse::<PermissionLevel>().is_err());
    }
}
