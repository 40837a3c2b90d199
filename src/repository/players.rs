//! Player repository

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DomainError, Player, Role, Session};
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    id: Uuid,
    name: String,
    surname: String,
    birth_date: Option<NaiveDate>,
    team_ids: Vec<String>,
    main_team_id: Option<String>,
    user_id: Option<Uuid>,
    parent_name: Option<String>,
    parent_email: Option<String>,
    jersey_number: Option<i32>,
    position: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: row.id,
            name: row.name,
            surname: row.surname,
            birth_date: row.birth_date,
            team_ids: row.team_ids,
            main_team_id: row.main_team_id,
            user_id: row.user_id,
            parent_name: row.parent_name,
            parent_email: row.parent_email,
            jersey_number: row.jersey_number,
            position: row.position,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PLAYER_COLUMNS: &str = "id, name, surname, birth_date, team_ids, main_team_id, user_id, \
     parent_name, parent_email, jersey_number, position, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, player: &Player) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO players (id, name, surname, birth_date, team_ids, main_team_id,
                                 user_id, parent_name, parent_email, jersey_number,
                                 position, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(&player.surname)
        .bind(player.birth_date)
        .bind(&player.team_ids)
        .bind(&player.main_team_id)
        .bind(player.user_id)
        .bind(&player.parent_name)
        .bind(&player.parent_email)
        .bind(player.jersey_number)
        .bind(&player.position)
        .bind(player.created_by)
        .bind(player.created_at)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one player; distinguishable not-found.
    pub async fn get(&self, player_id: Uuid) -> Result<Player, AppError> {
        let row: Option<PlayerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM players WHERE id = $1",
            PLAYER_COLUMNS
        ))
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Player::from)
            .ok_or_else(|| DomainError::PlayerNotFound(player_id).into())
    }

    /// Current roster of one team (no role scoping; used for participant
    /// resolution at event creation).
    pub async fn roster(&self, team_id: &str) -> Result<Vec<Player>, AppError> {
        let rows: Vec<PlayerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM players WHERE $1 = ANY(team_ids) ORDER BY surname, name",
            PLAYER_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Player::from).collect())
    }

    /// List players visible to the session role, optionally filtered to
    /// one team.
    pub async fn list(
        &self,
        session: &Session,
        team_id: Option<&str>,
    ) -> Result<Vec<Player>, AppError> {
        let rows: Vec<PlayerRow> = match session.role {
            Role::Superadmin => match team_id {
                Some(team) => {
                    sqlx::query_as(&format!(
                        "SELECT {} FROM players WHERE $1 = ANY(team_ids) ORDER BY surname, name",
                        PLAYER_COLUMNS
                    ))
                    .bind(team)
                    .fetch_all(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query_as(&format!(
                        "SELECT {} FROM players ORDER BY surname, name",
                        PLAYER_COLUMNS
                    ))
                    .fetch_all(&self.pool)
                    .await?
                }
            },
            Role::Coach => {
                // Players on any team this coach is assigned to
                let base = format!(
                    r#"
                    SELECT {} FROM players
                    WHERE team_ids && (
                        SELECT COALESCE(ARRAY_AGG(id), '{{}}') FROM teams
                        WHERE $1 = ANY(coach_ids)
                    )
                    "#,
                    PLAYER_COLUMNS
                );
                match team_id {
                    Some(team) => {
                        sqlx::query_as(&format!(
                            "{} AND $2 = ANY(team_ids) ORDER BY surname, name",
                            base
                        ))
                        .bind(session.user_id)
                        .bind(team)
                        .fetch_all(&self.pool)
                        .await?
                    }
                    None => {
                        sqlx::query_as(&format!("{} ORDER BY surname, name", base))
                            .bind(session.user_id)
                            .fetch_all(&self.pool)
                            .await?
                    }
                }
            }
            Role::Parent => {
                // Only players linked to the parent account
                let base = format!(
                    "SELECT {} FROM players WHERE user_id = $1",
                    PLAYER_COLUMNS
                );
                match team_id {
                    Some(team) => {
                        sqlx::query_as(&format!(
                            "{} AND $2 = ANY(team_ids) ORDER BY surname, name",
                            base
                        ))
                        .bind(session.user_id)
                        .bind(team)
                        .fetch_all(&self.pool)
                        .await?
                    }
                    None => {
                        sqlx::query_as(&format!("{} ORDER BY surname, name", base))
                            .bind(session.user_id)
                            .fetch_all(&self.pool)
                            .await?
                    }
                }
            }
        };

        Ok(rows.into_iter().map(Player::from).collect())
    }

    /// Ids of all players linked to a parent account.
    pub async fn linked_player_ids(&self, parent_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM players WHERE user_id = $1")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    pub async fn update(&self, player: &Player) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET name = $2, surname = $3, birth_date = $4, team_ids = $5,
                main_team_id = $6, user_id = $7, parent_name = $8, parent_email = $9,
                jersey_number = $10, position = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(&player.surname)
        .bind(player.birth_date)
        .bind(&player.team_ids)
        .bind(&player.main_team_id)
        .bind(player.user_id)
        .bind(&player.parent_name)
        .bind(&player.parent_email)
        .bind(player.jersey_number)
        .bind(&player.position)
        .bind(player.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PlayerNotFound(player.id).into());
        }
        Ok(())
    }

    pub async fn delete(&self, player_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PlayerNotFound(player_id).into());
        }
        Ok(())
    }
}
