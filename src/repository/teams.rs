//! Team repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DomainError, Role, Session, Team};
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: String,
    name: String,
    age_group: String,
    group_name: String,
    description: Option<String>,
    coach_ids: Vec<Uuid>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: row.id,
            name: row.name,
            age_group: row.age_group,
            group_name: row.group_name,
            description: row.description,
            coach_ids: row.coach_ids,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TEAM_COLUMNS: &str =
    "id, name, age_group, group_name, description, coach_ids, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new team. The slug id is the identity; an existing row
    /// with the same id is a collision, surfaced as a conflict instead
    /// of silently creating a second team.
    pub async fn insert(&self, team: &Team) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO teams (id, name, age_group, group_name, description,
                               coach_ids, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&team.id)
        .bind(&team.name)
        .bind(&team.age_group)
        .bind(&team.group_name)
        .bind(&team.description)
        .bind(&team.coach_ids)
        .bind(team.created_by)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TeamAlreadyExists(team.id.clone()).into());
        }
        Ok(())
    }

    /// Fetch one team; distinguishable not-found.
    pub async fn get(&self, team_id: &str) -> Result<Team, AppError> {
        let row: Option<TeamRow> =
            sqlx::query_as(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
                .bind(team_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Team::from)
            .ok_or_else(|| DomainError::TeamNotFound(team_id.to_string()).into())
    }

    /// List teams visible to the session role.
    ///
    /// Parents see teams any of their linked players belongs to; coaches
    /// see teams they are assigned to; superadmins see everything.
    pub async fn list(&self, session: &Session) -> Result<Vec<Team>, AppError> {
        let rows: Vec<TeamRow> = match session.role {
            Role::Superadmin => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM teams ORDER BY id ASC",
                    TEAM_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
            Role::Coach => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM teams WHERE $1 = ANY(coach_ids) ORDER BY id ASC",
                    TEAM_COLUMNS
                ))
                .bind(session.user_id)
                .fetch_all(&self.pool)
                .await?
            }
            Role::Parent => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {} FROM teams
                    WHERE id IN (
                        SELECT UNNEST(team_ids) FROM players WHERE user_id = $1
                    )
                    ORDER BY id ASC
                    "#,
                    TEAM_COLUMNS
                ))
                .bind(session.user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Team::from).collect())
    }

    /// Update mutable fields (name, description, coach assignment).
    /// Identity fields never change here.
    pub async fn update(&self, team: &Team) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = $2, description = $3, coach_ids = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(&team.id)
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.coach_ids)
        .bind(team.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TeamNotFound(team.id.clone()).into());
        }
        Ok(())
    }

    /// Delete a team and cascade the reference out of every player's
    /// team list (clearing main_team_id where it pointed here), in one
    /// transaction.
    pub async fn delete_cascading(&self, team_id: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(DomainError::TeamNotFound(team_id.to_string()).into());
        }

        sqlx::query(
            r#"
            UPDATE players
            SET team_ids = array_remove(team_ids, $1),
                main_team_id = CASE
                    WHEN main_team_id = $1 THEN (array_remove(team_ids, $1))[1]
                    ELSE main_team_id
                END,
                updated_at = $2
            WHERE $1 = ANY(team_ids)
            "#,
        )
        .bind(team_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
