//! Module registry.
//!
//! The order of [`MODULES`] is part of the persisted data model: legacy
//! positional override rows and the compiled-in default matrix are indexed by
//! it. New modules are appended at the end. Never reorder or remove entries.

use kader_common::{ModuleInfo, NavigationEntry};

/// Number of registered modules.
pub const MODULE_COUNT: usize = 21;

pub const DASHBOARD: &str = "Dashboard";
pub const CLUB_PROFILE: &str = "Club Profile";
pub const TEAMS: &str = "Teams";
pub const PLAYER_MANAGEMENT: &str = "Player Management";
pub const TRAINING_PLANNING: &str = "Training Planning";
pub const LANGUAGE_SETTINGS: &str = "Language Settings";
pub const CHAT: &str = "Chat";
pub const CALENDAR: &str = "Calendar";
pub const MATCH_CENTER: &str = "Match Center";
pub const MEDICAL_CENTER: &str = "Medical Center";
pub const SCOUTING: &str = "Scouting";
pub const REFERRALS: &str = "Referrals";
pub const SPONSORING: &str = "Sponsoring";
pub const INVESTOR_RELATIONS: &str = "Investor Relations";
pub const FINANCES: &str = "Finances";
pub const FACILITIES: &str = "Facilities";
pub const SHOP: &str = "Shop";
pub const MARKETING: &str = "Marketing";
pub const DOCUMENTS: &str = "Documents";
pub const REFEREE_ASSIGNMENTS: &str = "Referee Assignments";
pub const ROLES_AND_RIGHTS: &str = "Roles & Rights";

/// Registered modules in their stable order.
pub const MODULES: [ModuleInfo; MODULE_COUNT] = [
    ModuleInfo {
        name: DASHBOARD,
        description: "Overview of club activity, key figures and upcoming events",
    },
    ModuleInfo {
        name: CLUB_PROFILE,
        description: "Club master data, logo, contact details and public profile",
    },
    ModuleInfo {
        name: TEAMS,
        description: "Team rosters, age groups and squad assignments",
    },
    ModuleInfo {
        name: PLAYER_MANAGEMENT,
        description: "Player records, contracts, transfers and CSV import",
    },
    ModuleInfo {
        name: TRAINING_PLANNING,
        description: "Training sessions, drills and attendance",
    },
    ModuleInfo {
        name: LANGUAGE_SETTINGS,
        description: "Interface language and translation overrides for the club",
    },
    ModuleInfo {
        name: CHAT,
        description: "Direct and group messaging between club members",
    },
    ModuleInfo {
        name: CALENDAR,
        description: "Shared club calendar for matches, trainings and events",
    },
    ModuleInfo {
        name: MATCH_CENTER,
        description: "Fixtures, line-ups, results and match reports",
    },
    ModuleInfo {
        name: MEDICAL_CENTER,
        description: "Injuries, treatments and medical clearance of players",
    },
    ModuleInfo {
        name: SCOUTING,
        description: "Scouting reports, talent lists and player evaluations",
    },
    ModuleInfo {
        name: REFERRALS,
        description: "Player referrals between scouts, agents and clubs",
    },
    ModuleInfo {
        name: SPONSORING,
        description: "Sponsor contracts, packages and flyer generation",
    },
    ModuleInfo {
        name: INVESTOR_RELATIONS,
        description: "Investor dashboards, reports and shareholder communication",
    },
    ModuleInfo {
        name: FINANCES,
        description: "Budgets, membership fees, invoices and charts",
    },
    ModuleInfo {
        name: FACILITIES,
        description: "Pitches, rooms and equipment booking",
    },
    ModuleInfo {
        name: SHOP,
        description: "Merchandise catalogue and supplier orders",
    },
    ModuleInfo {
        name: MARKETING,
        description: "Campaigns, newsletters and social media planning",
    },
    ModuleInfo {
        name: DOCUMENTS,
        description: "Document storage, templates and exports",
    },
    ModuleInfo {
        name: REFEREE_ASSIGNMENTS,
        description: "Referee nominations and match official reports",
    },
    ModuleInfo {
        name: ROLES_AND_RIGHTS,
        description: "Role permission matrix and user role assignments",
    },
];

/// Menu entries of the web client.
#[rustfmt::skip]
pub const NAVIGATION: &[NavigationEntry] = &[
    NavigationEntry { path: "/dashboard", module: DASHBOARD, label: "Dashboard" },
    NavigationEntry { path: "/club", module: CLUB_PROFILE, label: "Club" },
    NavigationEntry { path: "/teams", module: TEAMS, label: "Teams" },
    NavigationEntry { path: "/players", module: PLAYER_MANAGEMENT, label: "Players" },
    NavigationEntry { path: "/players/import", module: PLAYER_MANAGEMENT, label: "Player Import" },
    NavigationEntry { path: "/training", module: TRAINING_PLANNING, label: "Training" },
    NavigationEntry { path: "/settings/language", module: LANGUAGE_SETTINGS, label: "Language" },
    NavigationEntry { path: "/chat", module: CHAT, label: "Chat" },
    NavigationEntry { path: "/calendar", module: CALENDAR, label: "Calendar" },
    NavigationEntry { path: "/matches", module: MATCH_CENTER, label: "Match Center" },
    NavigationEntry { path: "/medical", module: MEDICAL_CENTER, label: "Medical Center" },
    NavigationEntry { path: "/scouting", module: SCOUTING, label: "Scouting" },
    NavigationEntry { path: "/referrals", module: REFERRALS, label: "Referrals" },
    NavigationEntry { path: "/sponsors", module: SPONSORING, label: "Sponsors" },
    NavigationEntry { path: "/sponsors/flyer", module: SPONSORING, label: "Flyer Generator" },
    NavigationEntry { path: "/investors", module: INVESTOR_RELATIONS, label: "Investors" },
    NavigationEntry { path: "/finances", module: FINANCES, label: "Finances" },
    NavigationEntry { path: "/facilities", module: FACILITIES, label: "Facilities" },
    NavigationEntry { path: "/shop", module: SHOP, label: "Shop" },
    NavigationEntry { path: "/marketing", module: MARKETING, label: "Marketing" },
    NavigationEntry { path: "/documents", module: DOCUMENTS, label: "Documents" },
    NavigationEntry { path: "/referees", module: REFEREE_ASSIGNMENTS, label: "Referees" },
    NavigationEntry { path: "/settings/roles", module: ROLES_AND_RIGHTS, label: "Roles & Rights" },
];

/// Module names in their stable order.
pub fn module_order() -> impl ExactSizeIterator<Item = &'static str> + Clone {
    MODULES.iter().map(|m| m.name)
}

/// All registered modules.
#[must_use]
pub const fn modules() -> &'static [ModuleInfo] {
    &MODULES
}

/// Position of a module in the registry.
#[must_use]
pub fn module_index(name: &str) -> Option<usize> {
    MODULES.iter().position(|m| m.name == name)
}

/// Whether `name` is a registered module.
#[must_use]
pub fn is_known_module(name: &str) -> bool {
    module_index(name).is_some()
}

/// Description of a module, or an empty string for unknown names.
#[must_use]
pub fn module_description(name: &str) -> &'static str {
    MODULES
        .iter()
        .find(|m| m.name == name)
        .map_or("", |m| m.description)
}

/// All navigation entries, in menu order.
#[must_use]
pub const fn navigation_entries() -> &'static [NavigationEntry] {
    NAVIGATION
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Guards the persisted order. Appending a module means appending here.
    #[test]
    fn test_module_order_is_stable() {
        let order: Vec<_> = module_order().collect();
        assert_eq!(
            order,
            [
                "Dashboard",
                "Club Profile",
                "Teams",
                "Player Management",
                "Training Planning",
                "Language Settings",
                "Chat",
                "Calendar",
                "Match Center",
                "Medical Center",
                "Scouting",
                "Referrals",
                "Sponsoring",
                "Investor Relations",
                "Finances",
                "Facilities",
                "Shop",
                "Marketing",
                "Documents",
                "Referee Assignments",
                "Roles & Rights",
            ]
        );
    }

    #[test]
    fn test_module_names_are_unique() {
        let mut names: Vec<_> = module_order().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MODULE_COUNT);
    }

    #[test]
    fn test_module_index() {
        assert_eq!(module_index(DASHBOARD), Some(0));
        assert_eq!(module_index(LANGUAGE_SETTINGS), Some(5));
        assert_eq!(module_index(ROLES_AND_RIGHTS), Some(MODULE_COUNT - 1));
        assert_eq!(module_index("NonexistentModule"), None);
        assert_eq!(module_index("chat"), None);
    }

    #[test]
    fn test_module_description_fails_softly() {
        assert!(!module_description(MEDICAL_CENTER).is_empty());
        assert_eq!(module_description("NonexistentModule"), "");
        assert_eq!(module_description(""), "");
    }

    #[test]
    fn test_every_module_has_a_description() {
        for module in modules() {
            assert!(!module.description.is_empty(), "{} lacks a description", module.name);
        }
    }

    #[test]
    fn test_navigation_references_known_modules() {
        for entry in navigation_entries() {
            assert!(
                is_known_module(entry.module),
                "{} points at unknown module {}",
                entry.path,
                entry.module
            );
            assert!(entry.path.starts_with('/'));
        }
    }

    #[test]
    fn test_navigation_paths_are_unique() {
        let mut paths: Vec<_> = navigation_entries().iter().map(|e| e.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), navigation_entries().len());
    }
}
