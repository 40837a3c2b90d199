//! Attendance handlers
//!
//! Declaration writes go through the event's embedded map and are
//! committed as one row update. Authorization is per player link: any
//! parent account linked to the player may declare, update or withdraw,
//! regardless of who declared first.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    can_perform, Action, AttendanceDeclaration, AttendanceSummary, DeclarationMap, DomainError,
    Event, Resource, Role, Session,
};
use crate::error::AppError;
use crate::repository::{EventRepository, PlayerRepository, TeamRepository};

use super::{visibility, DeclareAttendanceCommand};

/// Declarations and derived counts for one event.
#[derive(Debug, Serialize)]
pub struct AttendanceView {
    pub event_id: Uuid,
    pub declarations: DeclarationMap,
    pub summary: AttendanceSummary,
}

/// One participant with their declaration, if any. Undeclared players
/// appear with a null declaration rather than being omitted.
#[derive(Debug, Serialize)]
pub struct ParticipantAttendance {
    pub player_id: Uuid,
    pub name: String,
    pub surname: String,
    pub declaration: Option<AttendanceDeclaration>,
}

/// Per-player attendance detail for one event.
#[derive(Debug, Serialize)]
pub struct AttendanceDetail {
    pub event_id: Uuid,
    pub participants: Vec<ParticipantAttendance>,
    pub summary: AttendanceSummary,
}

pub struct AttendanceHandler {
    events: EventRepository,
    players: PlayerRepository,
    teams: TeamRepository,
}

impl AttendanceHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            players: PlayerRepository::new(pool.clone()),
            teams: TeamRepository::new(pool),
        }
    }

    /// Submit a declaration for a participant of a scheduled event.
    /// Resubmitting overwrites; the last write wins.
    pub async fn submit(
        &self,
        event_id: Uuid,
        command: DeclareAttendanceCommand,
        session: &Session,
    ) -> Result<AttendanceView, AppError> {
        if !can_perform(session.role, Action::Create, Resource::Declaration) {
            return Err(AppError::Forbidden(
                "Role cannot submit declarations".to_string(),
            ));
        }

        let mut event = self.events.get(event_id).await?;
        self.ensure_declares_for(command.player_id, session).await?;

        event.submit_declaration(
            command.player_id,
            session.user_id,
            command.status,
            command.notes,
            Utc::now(),
        )?;
        self.events.update_declarations(&event).await?;

        tracing::info!(%event_id, player_id = %command.player_id, "attendance declared");
        Ok(Self::view(&event))
    }

    /// Overwrite an existing declaration.
    pub async fn update(
        &self,
        event_id: Uuid,
        command: DeclareAttendanceCommand,
        session: &Session,
    ) -> Result<AttendanceView, AppError> {
        if !can_perform(session.role, Action::Edit, Resource::Declaration) {
            return Err(AppError::Forbidden(
                "Role cannot update declarations".to_string(),
            ));
        }

        let mut event = self.events.get(event_id).await?;
        self.ensure_declares_for(command.player_id, session).await?;

        event.update_declaration(
            command.player_id,
            session.user_id,
            command.status,
            command.notes,
            Utc::now(),
        )?;
        self.events.update_declarations(&event).await?;
        Ok(Self::view(&event))
    }

    /// Withdraw a declaration; the player reverts to undeclared.
    pub async fn remove(
        &self,
        event_id: Uuid,
        player_id: Uuid,
        session: &Session,
    ) -> Result<AttendanceView, AppError> {
        if !can_perform(session.role, Action::Delete, Resource::Declaration) {
            return Err(AppError::Forbidden(
                "Role cannot withdraw declarations".to_string(),
            ));
        }

        let mut event = self.events.get(event_id).await?;
        self.ensure_declares_for(player_id, session).await?;

        event.remove_declaration(player_id, Utc::now())?;
        self.events.update_declarations(&event).await?;
        Ok(Self::view(&event))
    }

    /// Raw declaration map plus derived counts. The map carries parent
    /// ids and notes, so reads are scoped like the event itself.
    pub async fn read(&self, event_id: Uuid, session: &Session) -> Result<AttendanceView, AppError> {
        if !can_perform(session.role, Action::View, Resource::Declaration) {
            return Err(AppError::Forbidden(
                "Role cannot view declarations".to_string(),
            ));
        }
        let event = self.events.get(event_id).await?;
        visibility::ensure_event_visible(&self.teams, &self.players, &event, session).await?;
        Ok(Self::view(&event))
    }

    /// Hydrated per-player view for coach dashboards: every participant
    /// listed, declared or not.
    pub async fn detail(
        &self,
        event_id: Uuid,
        session: &Session,
    ) -> Result<AttendanceDetail, AppError> {
        if !can_perform(session.role, Action::View, Resource::Declaration) {
            return Err(AppError::Forbidden(
                "Role cannot view declarations".to_string(),
            ));
        }
        let event = self.events.get(event_id).await?;
        visibility::ensure_event_visible(&self.teams, &self.players, &event, session).await?;

        let mut participants = Vec::with_capacity(event.participant_ids.len());
        for player_id in &event.participant_ids {
            let player = self.players.get(*player_id).await?;
            participants.push(ParticipantAttendance {
                player_id: *player_id,
                name: player.name,
                surname: player.surname,
                declaration: event.attendance_declarations.get(player_id).cloned(),
            });
        }

        Ok(AttendanceDetail {
            event_id: event.id,
            summary: event.attendance_summary(),
            participants,
        })
    }

    fn view(event: &Event) -> AttendanceView {
        AttendanceView {
            event_id: event.id,
            declarations: event.attendance_declarations.clone(),
            summary: event.attendance_summary(),
        }
    }

    /// A parent declares only for players linked to their own account;
    /// superadmins may declare on anyone's behalf.
    async fn ensure_declares_for(&self, player_id: Uuid, session: &Session) -> Result<(), AppError> {
        if session.role == Role::Superadmin {
            return Ok(());
        }
        let player = self.players.get(player_id).await?;
        if !player.is_linked_to(session.user_id) {
            return Err(DomainError::Unauthorized(
                "Player is not linked to this account".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
