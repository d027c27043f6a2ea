//! Role Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Platform role.
///
/// Roles are a closed set compiled into the application. Users are assigned
/// exactly one role; what a role may do is decided by the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Platform operator with access to every club.
    #[serde(rename = "Super-Admin")]
    SuperAdmin,
    /// Administrator of a single club.
    #[serde(rename = "Club-Admin")]
    ClubAdmin,
    /// Sporting or business manager of a club.
    #[serde(rename = "Manager")]
    Manager,
    /// Team coach.
    #[serde(rename = "Coach")]
    Coach,
    /// Registered player.
    #[serde(rename = "Player")]
    Player,
    /// Parent or guardian of a youth player.
    #[serde(rename = "Parent")]
    Parent,
    /// Club sponsor.
    #[serde(rename = "Sponsor")]
    Sponsor,
    /// Investor following club figures.
    #[serde(rename = "Investor")]
    Investor,
    /// Match official.
    #[serde(rename = "Referee")]
    Referee,
    /// Association or federation staff.
    #[serde(rename = "Federation")]
    Federation,
    /// Scout.
    #[serde(rename = "Scouting")]
    Scouting,
    /// Equipment or service supplier.
    #[serde(rename = "Supplier")]
    Supplier,
    /// Supporter.
    #[serde(rename = "Fan")]
    Fan,
    /// Marketing staff.
    #[serde(rename = "Marketing")]
    Marketing,
    /// Club board member.
    #[serde(rename = "Board")]
    Board,
    /// Stadium and facility staff.
    #[serde(rename = "Facility Manager")]
    FacilityManager,
    /// External medical provider (physio, doctor).
    #[serde(rename = "Provider-Medical")]
    ProviderMedical,
    /// External fitness and athletic provider.
    #[serde(rename = "Provider-Fitness")]
    ProviderFitness,
    /// External travel provider.
    #[serde(rename = "Provider-Travel")]
    ProviderTravel,
}

impl Role {
    /// All roles in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SuperAdmin,
            Self::ClubAdmin,
            Self::Manager,
            Self::Coach,
            Self::Player,
            Self::Parent,
            Self::Sponsor,
            Self::Investor,
            Self::Referee,
            Self::Federation,
            Self::Scouting,
            Self::Supplier,
            Self::Fan,
            Self::Marketing,
            Self::Board,
            Self::FacilityManager,
            Self::ProviderMedical,
            Self::ProviderFitness,
            Self::ProviderTravel,
        ]
    }

    /// Wire identifier, identical to the serde representation.
    ///
    /// ```
    /// use kader_common::Role;
    ///
    /// assert_eq!(Role::ClubAdmin.as_str(), "Club-Admin");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super-Admin",
            Self::ClubAdmin => "Club-Admin",
            Self::Manager => "Manager",
            Self::Coach => "Coach",
            Self::Player => "Player",
            Self::Parent => "Parent",
            Self::Sponsor => "Sponsor",
            Self::Investor => "Investor",
            Self::Referee => "Referee",
            Self::Federation => "Federation",
            Self::Scouting => "Scouting",
            Self::Supplier => "Supplier",
            Self::Fan => "Fan",
            Self::Marketing => "Marketing",
            Self::Board => "Board",
            Self::FacilityManager => "Facility Manager",
            Self::ProviderMedical => "Provider-Medical",
            Self::ProviderFitness => "Provider-Fitness",
            Self::ProviderTravel => "Provider-Travel",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    /// Exact, case-sensitive match on the wire identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseError::UnknownRole(s.to_string()))
    }
}
