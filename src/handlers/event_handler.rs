//! Event handlers
//!
//! Event creation fans out over the selected teams: one event per team,
//! each committed independently so a bad team does not sink its
//! siblings. Titles and descriptions are derived per team when the
//! caller leaves them blank.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    can_perform, resolve_participants, schedule, Action, DomainError, Event, Player, Resource,
    Session,
};
use crate::error::AppError;
use crate::repository::{EventRepository, PlayerRepository, TeamRepository};

use super::{
    visibility, CreateEventCommand, CreateEventsResult, EventCreationFailure, UpdateEventCommand,
};

pub struct EventHandler {
    events: EventRepository,
    players: PlayerRepository,
    teams: TeamRepository,
}

impl EventHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            players: PlayerRepository::new(pool.clone()),
            teams: TeamRepository::new(pool),
        }
    }

    /// Create one event per selected team. Failures are collected per
    /// team; successfully created events stay committed.
    pub async fn create(
        &self,
        command: CreateEventCommand,
        session: &Session,
    ) -> Result<CreateEventsResult, AppError> {
        if !can_perform(session.role, Action::Create, Resource::Event) {
            return Err(AppError::Forbidden(
                "Role cannot create events".to_string(),
            ));
        }
        if command.team_ids.is_empty() {
            return Err(AppError::InvalidRequest(
                "At least one team is required".to_string(),
            ));
        }

        let mut created = Vec::new();
        let mut failures = Vec::new();
        for team_id in &command.team_ids {
            match self.create_for_team(&command, team_id, session).await {
                Ok(event) => created.push(event),
                Err(e) => failures.push(EventCreationFailure {
                    team_id: team_id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        tracing::info!(
            created = created.len(),
            failed = failures.len(),
            "event batch creation finished"
        );
        Ok(CreateEventsResult { created, failures })
    }

    async fn create_for_team(
        &self,
        command: &CreateEventCommand,
        team_id: &str,
        session: &Session,
    ) -> Result<Event, AppError> {
        let team = self.teams.get(team_id).await?;
        let roster_players = self.players.roster(team_id).await?;
        let roster: Vec<&Player> = roster_players.iter().collect();
        let participant_ids = resolve_participants(&command.participants, team_id, &roster)?;

        let title = match &command.title {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => schedule::derive_title(command.event_type, &team.name, command.start_date),
        };
        let description = match &command.description {
            Some(d) if !d.trim().is_empty() => Some(d.clone()),
            _ => Some(schedule::derive_description(
                command.event_type,
                &team.name,
                command.start_date,
                command.end_date,
                command.location.as_deref(),
            )),
        };

        let event = Event::new(
            title,
            description,
            command.event_type,
            command.start_date,
            command.end_date,
            command.location.clone(),
            team_id.to_string(),
            participant_ids,
            command.opponent.clone(),
            session.user_id,
            Utc::now(),
        )?;

        self.events.insert(&event).await?;
        Ok(event)
    }

    /// Fetch one event, with the status re-derived from the clock before
    /// it is returned: a lapsed sweep interval never shows a stale
    /// scheduled event as still upcoming.
    pub async fn get(&self, event_id: Uuid, session: &Session) -> Result<Event, AppError> {
        let mut event = self.events.get(event_id).await?;
        self.ensure_visible(&event, session).await?;

        let now = Utc::now();
        if event.apply_due_transition(now) {
            self.events
                .update_status(event.id, event.status, now)
                .await?;
        }
        Ok(event)
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<Event>, AppError> {
        if !can_perform(session.role, Action::View, Resource::Event) {
            return Err(AppError::Forbidden("Role cannot view events".to_string()));
        }
        self.events.list(session).await
    }

    /// Update a single-team event. Events spanning several teams reject
    /// edits; recreate them instead.
    pub async fn update(
        &self,
        event_id: Uuid,
        command: UpdateEventCommand,
        session: &Session,
    ) -> Result<Event, AppError> {
        if !can_perform(session.role, Action::Edit, Resource::Event) {
            return Err(AppError::Forbidden("Role cannot edit events".to_string()));
        }

        let mut event = self.events.get(event_id).await?;
        self.ensure_visible(&event, session).await?;
        if event.team_ids.len() > 1 {
            return Err(DomainError::MultiTeamEditUnsupported.into());
        }

        let now = Utc::now();
        if let Some(title) = command.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Event title is required".to_string()).into());
            }
            event.title = title;
        }
        if let Some(description) = command.description {
            event.description = Some(description);
        }
        if let Some(event_type) = command.event_type {
            event.event_type = event_type;
        }
        if let Some(start_date) = command.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = command.end_date {
            event.end_date = Some(end_date);
        }
        if let Some(location) = command.location {
            event.location = Some(location);
        }
        if let Some(opponent) = command.opponent {
            event.opponent = Some(opponent);
        }
        if let Some(end) = event.end_date {
            if end <= event.start_date {
                return Err(DomainError::InvalidTimeWindow.into());
            }
        }

        if let Some(selection) = command.participants {
            let team_id = event.team_ids[0].clone();
            let roster_players = self.players.roster(&team_id).await?;
            let roster: Vec<&Player> = roster_players.iter().collect();
            event.participant_ids = resolve_participants(&selection, &team_id, &roster)?;
            // Declarations from removed participants do not linger
            let participant_ids = event.participant_ids.clone();
            event
                .attendance_declarations
                .retain(|player_id, _| participant_ids.contains(player_id));
        }

        event.updated_at = now;
        // A moved time window may change what status is due right now.
        event.apply_due_transition(now);

        self.events.update(&event).await?;
        Ok(event)
    }

    /// Explicit cancellation; the only path to the cancelled status.
    pub async fn cancel(&self, event_id: Uuid, session: &Session) -> Result<Event, AppError> {
        if !can_perform(session.role, Action::Edit, Resource::Event) {
            return Err(AppError::Forbidden("Role cannot cancel events".to_string()));
        }

        let mut event = self.events.get(event_id).await?;
        self.ensure_visible(&event, session).await?;

        let now = Utc::now();
        event.cancel(now)?;
        self.events.update_status(event.id, event.status, now).await?;

        tracing::info!(%event_id, "event cancelled");
        Ok(event)
    }

    pub async fn delete(&self, event_id: Uuid, session: &Session) -> Result<(), AppError> {
        if !can_perform(session.role, Action::Delete, Resource::Event) {
            return Err(AppError::Forbidden(
                "Role cannot delete events".to_string(),
            ));
        }
        self.events.delete(event_id).await?;
        tracing::info!(%event_id, "event deleted");
        Ok(())
    }

    async fn ensure_visible(&self, event: &Event, session: &Session) -> Result<(), AppError> {
        visibility::ensure_event_visible(&self.teams, &self.players, event, session).await
    }
}
