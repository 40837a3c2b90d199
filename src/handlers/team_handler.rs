//! Team handlers
//!
//! Team creation, editing and cascading deletion. The slug id is derived
//! at creation and frozen afterwards; edits to the identity-bearing
//! fields are rejected rather than re-slugged.

use chrono::Utc;
use sqlx::PgPool;

use crate::domain::{can_perform, Action, Resource, Session, Team};
use crate::error::AppError;
use crate::repository::{PlayerRepository, TeamRepository};

use super::{visibility, CreateTeamCommand, UpdateTeamCommand};

pub struct TeamHandler {
    teams: TeamRepository,
    players: PlayerRepository,
}

impl TeamHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            teams: TeamRepository::new(pool.clone()),
            players: PlayerRepository::new(pool),
        }
    }

    /// Create a team. The slug id doubles as the uniqueness check: two
    /// teams with the same age group and group name collide.
    pub async fn create(
        &self,
        command: CreateTeamCommand,
        session: &Session,
    ) -> Result<Team, AppError> {
        if !can_perform(session.role, Action::Create, Resource::Team) {
            return Err(AppError::Forbidden(
                "Role cannot create teams".to_string(),
            ));
        }

        let team = Team::new(
            command.name,
            command.age_group,
            command.group_name,
            command.description,
            command.coach_ids,
            session.user_id,
            Utc::now(),
        )?;

        self.teams.insert(&team).await?;

        tracing::info!(team_id = %team.id, "team created");
        Ok(team)
    }

    /// Fetch one team, scoped like the list: coaches see their own
    /// teams, parents the teams of their linked players.
    pub async fn get(&self, team_id: &str, session: &Session) -> Result<Team, AppError> {
        if !can_perform(session.role, Action::View, Resource::Team) {
            return Err(AppError::Forbidden("Role cannot view teams".to_string()));
        }
        let team = self.teams.get(team_id).await?;
        visibility::ensure_team_visible(&self.players, &team, session).await?;
        Ok(team)
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<Team>, AppError> {
        if !can_perform(session.role, Action::View, Resource::Team) {
            return Err(AppError::Forbidden("Role cannot view teams".to_string()));
        }
        self.teams.list(session).await
    }

    /// Update mutable fields. Age group and group name are identity; a
    /// caller echoing different values gets a precondition failure.
    pub async fn update(
        &self,
        team_id: &str,
        command: UpdateTeamCommand,
        session: &Session,
    ) -> Result<Team, AppError> {
        if !can_perform(session.role, Action::Edit, Resource::Team) {
            return Err(AppError::Forbidden("Role cannot edit teams".to_string()));
        }

        let mut team = self.teams.get(team_id).await?;
        visibility::ensure_team_visible(&self.players, &team, session).await?;
        team.ensure_identity_unchanged(
            command.age_group.as_deref(),
            command.group_name.as_deref(),
        )?;

        if let Some(name) = command.name {
            team.name = name;
        }
        if let Some(description) = command.description {
            team.description = Some(description);
        }
        if let Some(coach_ids) = command.coach_ids {
            team.coach_ids = coach_ids;
        }
        team.updated_at = Utc::now();
        team.validate()?;

        self.teams.update(&team).await?;
        Ok(team)
    }

    /// Delete a team, cascading the reference out of every player. Events
    /// keep their team slug; history is not rewritten.
    pub async fn delete(&self, team_id: &str, session: &Session) -> Result<(), AppError> {
        if !can_perform(session.role, Action::Delete, Resource::Team) {
            return Err(AppError::Forbidden("Role cannot delete teams".to_string()));
        }
        let team = self.teams.get(team_id).await?;
        visibility::ensure_team_visible(&self.players, &team, session).await?;

        self.teams.delete_cascading(team_id, Utc::now()).await?;
        tracing::info!(team_id, "team deleted");
        Ok(())
    }
}
