//! Player handlers
//!
//! Player registration and upkeep. Team references are validated against
//! stored teams on every write; parents registering a player always link
//! it to their own account.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{can_perform, Action, DomainError, Player, Resource, Role, Session};
use crate::error::AppError;
use crate::repository::{PlayerRepository, TeamRepository};

use super::{visibility, CreatePlayerCommand, UpdatePlayerCommand};

pub struct PlayerHandler {
    players: PlayerRepository,
    teams: TeamRepository,
}

impl PlayerHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            players: PlayerRepository::new(pool.clone()),
            teams: TeamRepository::new(pool),
        }
    }

    /// Every referenced team must exist before the player row is written.
    async fn ensure_teams_exist(&self, team_ids: &[String]) -> Result<(), AppError> {
        for team_id in team_ids {
            self.teams.get(team_id).await?;
        }
        Ok(())
    }

    pub async fn create(
        &self,
        command: CreatePlayerCommand,
        session: &Session,
    ) -> Result<Player, AppError> {
        if !can_perform(session.role, Action::Create, Resource::Player) {
            return Err(AppError::Forbidden(
                "Role cannot create players".to_string(),
            ));
        }

        self.ensure_teams_exist(&command.team_ids).await?;

        // A parent registers their own child; the link is not a choice.
        let user_id = match session.role {
            Role::Parent => Some(session.user_id),
            _ => command.user_id,
        };

        let mut player = Player::new(
            command.name,
            command.surname,
            command.birth_date,
            command.team_ids,
            command.main_team_id,
            user_id,
            session.user_id,
            Utc::now(),
        )?;
        player.parent_name = command.parent_name;
        player.parent_email = command.parent_email;
        player.jersey_number = command.jersey_number;
        player.position = command.position;

        self.players.insert(&player).await?;

        tracing::info!(player_id = %player.id, "player created");
        Ok(player)
    }

    /// Fetch one player, scoped like the list: parents their linked
    /// players, coaches the rosters of their own teams.
    pub async fn get(&self, player_id: Uuid, session: &Session) -> Result<Player, AppError> {
        let player = self.players.get(player_id).await?;
        visibility::ensure_player_visible(&self.teams, &player, session).await?;
        Ok(player)
    }

    pub async fn list(
        &self,
        session: &Session,
        team_id: Option<&str>,
    ) -> Result<Vec<Player>, AppError> {
        if !can_perform(session.role, Action::View, Resource::Player) {
            return Err(AppError::Forbidden("Role cannot view players".to_string()));
        }
        self.players.list(session, team_id).await
    }

    pub async fn update(
        &self,
        player_id: Uuid,
        command: UpdatePlayerCommand,
        session: &Session,
    ) -> Result<Player, AppError> {
        if !can_perform(session.role, Action::Edit, Resource::Player) {
            return Err(AppError::Forbidden("Role cannot edit players".to_string()));
        }

        let mut player = self.players.get(player_id).await?;
        visibility::ensure_player_visible(&self.teams, &player, session).await?;

        let now = Utc::now();
        if let Some(name) = command.name {
            player.name = name;
        }
        if let Some(surname) = command.surname {
            player.surname = surname;
        }
        if let Some(birth_date) = command.birth_date {
            player.birth_date = Some(birth_date);
        }
        if let Some(team_ids) = command.team_ids {
            self.ensure_teams_exist(&team_ids).await?;
            player.set_teams(team_ids, now);
        }
        if let Some(main_team_id) = command.main_team_id {
            if !player.team_ids.contains(&main_team_id) {
                return Err(DomainError::MainTeamNotInTeams(main_team_id).into());
            }
            player.main_team_id = Some(main_team_id);
        }
        if let Some(parent_name) = command.parent_name {
            player.parent_name = Some(parent_name);
        }
        if let Some(parent_email) = command.parent_email {
            player.parent_email = Some(parent_email);
        }
        if let Some(jersey_number) = command.jersey_number {
            player.jersey_number = Some(jersey_number);
        }
        if let Some(position) = command.position {
            player.position = Some(position);
        }
        player.updated_at = now;
        player.validate()?;

        self.players.update(&player).await?;
        Ok(player)
    }

    pub async fn delete(&self, player_id: Uuid, session: &Session) -> Result<(), AppError> {
        if !can_perform(session.role, Action::Delete, Resource::Player) {
            return Err(AppError::Forbidden(
                "Role cannot delete players".to_string(),
            ));
        }
        let player = self.players.get(player_id).await?;
        visibility::ensure_player_visible(&self.teams, &player, session).await?;
        self.players.delete(player_id).await?;
        tracing::info!(%player_id, "player deleted");
        Ok(())
    }
}
