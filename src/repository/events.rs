//! Event repository
//!
//! Events own their attendance declarations as an embedded JSONB map, so
//! a declaration write is a single-row update and stays atomic per
//! (event, player).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DeclarationMap, DomainError, Event, EventStatus, EventType, Role, Session};
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    event_type: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    location: Option<String>,
    team_ids: Vec<String>,
    participant_ids: Vec<Uuid>,
    opponent: Option<String>,
    status: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    attendance_declarations: serde_json::Value,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type: EventType = row
            .event_type
            .parse()
            .map_err(|e: String| AppError::Internal(format!("corrupt event type: {}", e)))?;
        let status: EventStatus = row
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(format!("corrupt event status: {}", e)))?;
        let attendance_declarations: DeclarationMap =
            serde_json::from_value(row.attendance_declarations).map_err(|e| {
                AppError::Internal(format!("corrupt attendance declarations: {}", e))
            })?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            event_type,
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location,
            team_ids: row.team_ids,
            participant_ids: row.participant_ids,
            opponent: row.opponent,
            status,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            attendance_declarations,
        })
    }
}

const EVENT_COLUMNS: &str = "id, title, description, event_type, start_date, end_date, location, \
     team_ids, participant_ids, opponent, status, created_by, created_at, updated_at, \
     attendance_declarations";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn declarations_json(event: &Event) -> Result<serde_json::Value, AppError> {
        serde_json::to_value(&event.attendance_declarations)
            .map_err(|e| AppError::Internal(format!("serialize declarations: {}", e)))
    }

    pub async fn insert(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, event_type, start_date, end_date,
                                location, team_ids, participant_ids, opponent, status,
                                created_by, created_at, updated_at, attendance_declarations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_type.to_string())
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.location)
        .bind(&event.team_ids)
        .bind(&event.participant_ids)
        .bind(&event.opponent)
        .bind(event.status.to_string())
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .bind(Self::declarations_json(event)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one event; distinguishable not-found (no null fallback on
    /// the detail path).
    pub async fn get(&self, event_id: Uuid) -> Result<Event, AppError> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Event::try_from(row),
            None => Err(DomainError::EventNotFound(event_id).into()),
        }
    }

    /// All events, oldest first. Used by the sweep.
    pub async fn list_all(&self) -> Result<Vec<Event>, AppError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events ORDER BY start_date ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    /// List events visible to the session role, ordered by start date.
    ///
    /// Parents see events whose participants intersect their linked
    /// players; coaches see events of their teams.
    pub async fn list(&self, session: &Session) -> Result<Vec<Event>, AppError> {
        let rows: Vec<EventRow> = match session.role {
            Role::Superadmin => self.list_rows_all().await?,
            Role::Coach => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {} FROM events
                    WHERE team_ids && (
                        SELECT COALESCE(ARRAY_AGG(id), '{{}}') FROM teams
                        WHERE $1 = ANY(coach_ids)
                    )
                    ORDER BY start_date ASC
                    "#,
                    EVENT_COLUMNS
                ))
                .bind(session.user_id)
                .fetch_all(&self.pool)
                .await?
            }
            Role::Parent => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {} FROM events
                    WHERE participant_ids && (
                        SELECT COALESCE(ARRAY_AGG(id), '{{}}') FROM players
                        WHERE user_id = $1
                    )
                    ORDER BY start_date ASC
                    "#,
                    EVENT_COLUMNS
                ))
                .bind(session.user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn list_rows_all(&self) -> Result<Vec<EventRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {} FROM events ORDER BY start_date ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Full update of mutable fields.
    pub async fn update(&self, event: &Event) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, event_type = $4, start_date = $5,
                end_date = $6, location = $7, participant_ids = $8, opponent = $9,
                status = $10, updated_at = $11, attendance_declarations = $12
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_type.to_string())
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.location)
        .bind(&event.participant_ids)
        .bind(&event.opponent)
        .bind(event.status.to_string())
        .bind(event.updated_at)
        .bind(Self::declarations_json(event)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id).into());
        }
        Ok(())
    }

    /// Commit a status transition only. Used by the sweep so racing
    /// interactive edits converge by the rule's idempotence.
    pub async fn update_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET status = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(event_id)
        .bind(status.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event_id).into());
        }
        Ok(())
    }

    /// Commit the declarations map in one row update.
    pub async fn update_declarations(&self, event: &Event) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET attendance_declarations = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(event.id)
        .bind(Self::declarations_json(event)?)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id).into());
        }
        Ok(())
    }

    /// Delete an event; its declarations cascade away with the document.
    pub async fn delete(&self, event_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event_id).into());
        }
        Ok(())
    }
}
