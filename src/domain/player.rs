//! Player entity
//!
//! Players belong to zero or more teams by id reference, with one
//! designated main team for display. A player may be linked to a parent
//! account; unlinked players carry contact details instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub birth_date: Option<NaiveDate>,
    /// Teams this player belongs to (slug references, no FK enforcement)
    pub team_ids: Vec<String>,
    /// Primary team for display; must be one of `team_ids` when set
    pub main_team_id: Option<String>,
    /// Link to a parent account; when set, contact fields are optional
    pub user_id: Option<Uuid>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player. When the caller provides teams but no main
    /// team, the first team becomes the main one.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        surname: String,
        birth_date: Option<NaiveDate>,
        team_ids: Vec<String>,
        main_team_id: Option<String>,
        user_id: Option<Uuid>,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() || surname.trim().is_empty() {
            return Err(DomainError::Validation(
                "Player name and surname are required".to_string(),
            ));
        }

        let main_team_id = match main_team_id {
            Some(main) => {
                if !team_ids.contains(&main) {
                    return Err(DomainError::MainTeamNotInTeams(main));
                }
                Some(main)
            }
            None => team_ids.first().cloned(),
        };

        Ok(Player {
            id: Uuid::new_v4(),
            name,
            surname,
            birth_date,
            team_ids,
            main_team_id,
            user_id,
            parent_name: None,
            parent_email: None,
            jersey_number: None,
            position: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check membership of a team roster.
    pub fn is_on_team(&self, team_id: &str) -> bool {
        self.team_ids.iter().any(|t| t == team_id)
    }

    /// Check link to a parent account.
    pub fn is_linked_to(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    /// Reassign the player's teams, keeping the main-team invariant: an
    /// invalid main team falls back to the first remaining team.
    pub fn set_teams(&mut self, team_ids: Vec<String>, now: DateTime<Utc>) {
        self.team_ids = team_ids;
        match &self.main_team_id {
            Some(main) if self.team_ids.contains(main) => {}
            _ => self.main_team_id = self.team_ids.first().cloned(),
        }
        self.updated_at = now;
    }

    /// Remove one team reference (team-deletion cascade). Returns true if
    /// the player actually referenced the team.
    pub fn remove_team(&mut self, team_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.team_ids.len();
        self.team_ids.retain(|t| t != team_id);
        if self.team_ids.len() == before {
            return false;
        }
        if self.main_team_id.as_deref() == Some(team_id) {
            self.main_team_id = self.team_ids.first().cloned();
        }
        self.updated_at = now;
        true
    }

    /// Validate invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() || self.surname.trim().is_empty() {
            return Err(DomainError::Validation(
                "Player name and surname are required".to_string(),
            ));
        }
        if let Some(main) = &self.main_team_id {
            if !self.team_ids.contains(main) {
                return Err(DomainError::MainTeamNotInTeams(main.clone()));
            }
        }
        Ok(())
    }
}

/// Roster of a team: every player whose `team_ids` includes it.
pub fn roster<'a>(players: &'a [Player], team_id: &str) -> Vec<&'a Player> {
    players.iter().filter(|p| p.is_on_team(team_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_on(teams: &[&str]) -> Player {
        Player::new(
            "Γιώργος".to_string(),
            "Παπαδόπουλος".to_string(),
            None,
            teams.iter().map(|t| t.to_string()).collect(),
            None,
            None,
            Uuid::new_v4(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_main_team_defaults_to_first() {
        let player = player_on(&["k10-a", "k12-b"]);
        assert_eq!(player.main_team_id.as_deref(), Some("k10-a"));
    }

    #[test]
    fn test_main_team_must_be_member() {
        let result = Player::new(
            "A".to_string(),
            "B".to_string(),
            None,
            vec!["k10-a".to_string()],
            Some("k12-b".to_string()),
            None,
            Uuid::new_v4(),
            Utc::now(),
        );
        assert_eq!(
            result.unwrap_err(),
            DomainError::MainTeamNotInTeams("k12-b".to_string())
        );
    }

    #[test]
    fn test_no_teams_no_main_team() {
        let player = player_on(&[]);
        assert!(player.main_team_id.is_none());
        assert!(player.validate().is_ok());
    }

    #[test]
    fn test_remove_team_cascade() {
        let mut player = player_on(&["k10-a", "k12-b"]);
        assert!(player.remove_team("k10-a", Utc::now()));
        assert_eq!(player.team_ids, vec!["k12-b".to_string()]);
        // Main team followed the cascade
        assert_eq!(player.main_team_id.as_deref(), Some("k12-b"));
        assert!(player.validate().is_ok());

        // Removing a team the player is not on is a no-op
        assert!(!player.remove_team("k10-a", Utc::now()));
    }

    #[test]
    fn test_remove_last_team_clears_main() {
        let mut player = player_on(&["k10-a"]);
        assert!(player.remove_team("k10-a", Utc::now()));
        assert!(player.team_ids.is_empty());
        assert!(player.main_team_id.is_none());
    }

    #[test]
    fn test_set_teams_keeps_valid_main() {
        let mut player = player_on(&["k10-a", "k12-b"]);
        player.set_teams(vec!["k12-b".to_string(), "k10-a".to_string()], Utc::now());
        // Main team still a member, unchanged
        assert_eq!(player.main_team_id.as_deref(), Some("k10-a"));

        player.set_teams(vec!["k14-c".to_string()], Utc::now());
        assert_eq!(player.main_team_id.as_deref(), Some("k14-c"));
    }

    #[test]
    fn test_roster() {
        let players = vec![
            player_on(&["k10-a"]),
            player_on(&["k12-b"]),
            player_on(&["k10-a", "k12-b"]),
        ];
        let roster_a = roster(&players, "k10-a");
        assert_eq!(roster_a.len(), 2);
        let roster_b = roster(&players, "k12-b");
        assert_eq!(roster_b.len(), 2);
        assert!(roster(&players, "k14-c").is_empty());
    }

    #[test]
    fn test_is_linked_to() {
        let parent = Uuid::new_v4();
        let mut player = player_on(&[]);
        assert!(!player.is_linked_to(parent));
        player.user_id = Some(parent);
        assert!(player.is_linked_to(parent));
        assert!(!player.is_linked_to(Uuid::new_v4()));
    }
}
