//! Team entity
//!
//! A team's identity is the slug of `ageGroup-groupName`; both fields are
//! frozen after creation because changing them would change the identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;
use super::slug::{team_slug, validate_slug};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Deterministic slug of `age_group-group_name`
    pub id: String,
    pub name: String,
    pub age_group: String,
    pub group_name: String,
    pub description: Option<String>,
    /// Coaches assigned to this team
    pub coach_ids: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team, deriving its id from age group and group name.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        age_group: String,
        group_name: String,
        description: Option<String>,
        coach_ids: Vec<Uuid>,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() || name.len() > 100 {
            return Err(DomainError::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }

        let id = team_slug(&age_group, &group_name)?;

        Ok(Team {
            id,
            name,
            age_group,
            group_name,
            description,
            coach_ids,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reject edits that would change the identity-bearing fields.
    pub fn ensure_identity_unchanged(
        &self,
        age_group: Option<&str>,
        group_name: Option<&str>,
    ) -> Result<(), DomainError> {
        if let Some(age) = age_group {
            if age != self.age_group {
                return Err(DomainError::TeamIdentityChange);
            }
        }
        if let Some(group) = group_name {
            if group != self.group_name {
                return Err(DomainError::TeamIdentityChange);
            }
        }
        Ok(())
    }

    /// Check whether a coach is assigned to this team.
    pub fn has_coach(&self, user_id: Uuid) -> bool {
        self.coach_ids.contains(&user_id)
    }

    /// Validate invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() || self.name.len() > 100 {
            return Err(DomainError::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }
        validate_slug(&self.id)?;
        let expected = team_slug(&self.age_group, &self.group_name)?;
        if expected != self.id {
            return Err(DomainError::Validation(format!(
                "Team id {} does not match its age group / group name",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_team() -> Team {
        Team::new(
            "Κ10 Α".to_string(),
            "Κ10".to_string(),
            "Α".to_string(),
            None,
            vec![],
            Uuid::new_v4(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_id_is_slug_of_identity() {
        let team = sample_team();
        assert_eq!(team.id, "k10-a");
        assert!(team.validate().is_ok());
    }

    #[test]
    fn test_same_identity_same_id() {
        let a = sample_team();
        let b = sample_team();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_identity_fields_frozen() {
        let team = sample_team();
        assert!(team.ensure_identity_unchanged(Some("Κ10"), Some("Α")).is_ok());
        assert!(team.ensure_identity_unchanged(None, None).is_ok());
        assert_eq!(
            team.ensure_identity_unchanged(Some("Κ12"), None),
            Err(DomainError::TeamIdentityChange)
        );
        assert_eq!(
            team.ensure_identity_unchanged(None, Some("Β")),
            Err(DomainError::TeamIdentityChange)
        );
    }

    #[test]
    fn test_name_validation() {
        let result = Team::new(
            "".to_string(),
            "Κ10".to_string(),
            "Α".to_string(),
            None,
            vec![],
            Uuid::new_v4(),
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_has_coach() {
        let coach = Uuid::new_v4();
        let mut team = sample_team();
        assert!(!team.has_coach(coach));
        team.coach_ids.push(coach);
        assert!(team.has_coach(coach));
    }

    #[test]
    fn test_validate_detects_mismatched_id() {
        let mut team = sample_team();
        team.id = "k12-b".to_string();
        assert!(team.validate().is_err());
    }
}
