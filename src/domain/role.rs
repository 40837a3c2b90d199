//! Roles and authorization
//!
//! The role is stored on the user profile record and consulted by the
//! access layer. Authorization is a pure predicate so it can be tested
//! without any HTTP or database machinery.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role, one per user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Coach,
    Superadmin,
}

impl Role {
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Coach => write!(f, "coach"),
            Role::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Role::Parent),
            "coach" => Ok(Role::Coach),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Action kinds checked by the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    View,
    Edit,
    Delete,
}

/// Resource kinds checked by the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Team,
    Player,
    Event,
    Declaration,
}

/// Pure authorization predicate: may `role` ever perform `action` on this
/// kind of `resource`?
///
/// Row-level scoping (which teams a coach sees, which players a parent
/// owns) is applied by repository query construction; this predicate only
/// answers the capability question.
pub fn can_perform(role: Role, action: Action, resource: Resource) -> bool {
    use Action::*;
    use Resource::*;

    match role {
        Role::Superadmin => true,
        Role::Coach => match resource {
            Team | Player | Event => true,
            // Coaches view declarations but never declare for players.
            Declaration => matches!(action, View),
        },
        Role::Parent => match resource {
            Team => matches!(action, View),
            // Parents may register their own children.
            Player => matches!(action, Create | View | Edit),
            Event => matches!(action, View),
            Declaration => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Parent, Role::Coach, Role::Superadmin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Superadmin).unwrap(),
            "\"superadmin\""
        );
        let role: Role = serde_json::from_str("\"coach\"").unwrap();
        assert_eq!(role, Role::Coach);
    }

    #[test]
    fn test_superadmin_can_do_everything() {
        for action in [Action::Create, Action::View, Action::Edit, Action::Delete] {
            for resource in [
                Resource::Team,
                Resource::Player,
                Resource::Event,
                Resource::Declaration,
            ] {
                assert!(can_perform(Role::Superadmin, action, resource));
            }
        }
    }

    #[test]
    fn test_parent_cannot_mutate_teams_or_events() {
        assert!(!can_perform(Role::Parent, Action::Create, Resource::Team));
        assert!(!can_perform(Role::Parent, Action::Delete, Resource::Team));
        assert!(!can_perform(Role::Parent, Action::Create, Resource::Event));
        assert!(!can_perform(Role::Parent, Action::Edit, Resource::Event));
        assert!(can_perform(Role::Parent, Action::View, Resource::Team));
        assert!(can_perform(Role::Parent, Action::View, Resource::Event));
    }

    #[test]
    fn test_parent_can_create_players_and_declare() {
        assert!(can_perform(Role::Parent, Action::Create, Resource::Player));
        assert!(can_perform(Role::Parent, Action::Create, Resource::Declaration));
        assert!(can_perform(Role::Parent, Action::Edit, Resource::Declaration));
        assert!(can_perform(Role::Parent, Action::Delete, Resource::Declaration));
    }

    #[test]
    fn test_coach_views_but_never_declares() {
        assert!(can_perform(Role::Coach, Action::View, Resource::Declaration));
        assert!(!can_perform(Role::Coach, Action::Create, Resource::Declaration));
        assert!(!can_perform(Role::Coach, Action::Edit, Resource::Declaration));
        assert!(can_perform(Role::Coach, Action::Create, Resource::Event));
        assert!(can_perform(Role::Coach, Action::Delete, Resource::Team));
    }
}
