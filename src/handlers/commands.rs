//! Command definitions
//!
//! Commands represent intentions to change the system state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AttendanceStatus, Event, EventType, ParticipantSelection};

// =========================================================================
// Team commands
// =========================================================================

/// Command to create a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamCommand {
    pub name: String,
    pub age_group: String,
    pub group_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub coach_ids: Vec<Uuid>,
}

/// Command to update a team. Identity fields may be echoed back by the
/// caller but must match the stored values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeamCommand {
    pub name: Option<String>,
    pub age_group: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub coach_ids: Option<Vec<Uuid>>,
}

// =========================================================================
// Player commands
// =========================================================================

/// Command to create a new player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayerCommand {
    pub name: String,
    pub surname: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub team_ids: Vec<String>,
    pub main_team_id: Option<String>,
    /// Parent account link. Ignored for parent callers, who always link
    /// the player to themselves.
    pub user_id: Option<Uuid>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
}

/// Command to update a player. Absent fields keep their stored values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlayerCommand {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub team_ids: Option<Vec<String>>,
    pub main_team_id: Option<String>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
}

// =========================================================================
// Event commands
// =========================================================================

/// Command to create events for one or more teams in a single call.
///
/// One event is created per team; title and description are derived per
/// team when the caller leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub team_ids: Vec<String>,
    pub participants: ParticipantSelection,
    pub opponent: Option<String>,
}

/// Command to update an event. Participant re-resolution happens only
/// when a selection is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub participants: Option<ParticipantSelection>,
    pub opponent: Option<String>,
}

// =========================================================================
// Attendance commands
// =========================================================================

/// Command to submit or overwrite an attendance declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclareAttendanceCommand {
    pub player_id: Uuid,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

// =========================================================================
// Results
// =========================================================================

/// One team's failure in a batch event creation
#[derive(Debug, Clone, Serialize)]
pub struct EventCreationFailure {
    pub team_id: String,
    pub error: String,
}

/// Result of a batch event creation: events that committed plus the
/// per-team failures that did not block them.
#[derive(Debug, Serialize)]
pub struct CreateEventsResult {
    pub created: Vec<Event>,
    pub failures: Vec<EventCreationFailure>,
}

impl CreateEventsResult {
    pub fn all_failed(&self) -> bool {
        self.created.is_empty() && !self.failures.is_empty()
    }
}
