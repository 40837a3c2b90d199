//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.
//! They represent business rule violations and invariant failures and
//! are independent of the web/persistence layer.

use thiserror::Error;
use uuid::Uuid;

use super::event::EventStatus;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Requested team id (slug) absent
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    /// Requested player id absent
    #[error("Player not found: {0}")]
    PlayerNotFound(Uuid),

    /// Requested event id absent
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    /// Requested user profile absent
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// A team with the same age group / group name already exists
    #[error("Team already exists: {0}")]
    TeamAlreadyExists(String),

    /// Age group / group name determine team identity and cannot change
    #[error("Team identity (age group, group name) cannot change after creation")]
    TeamIdentityChange,

    /// Slug derivation produced nothing usable
    #[error("Cannot derive a valid id from: {0}")]
    InvalidSlug(String),

    /// End date must be strictly after start date
    #[error("Event end date must be after its start date")]
    InvalidTimeWindow,

    /// Explicit participant mode with an empty selection
    #[error("At least one participant must be selected")]
    EmptyParticipantSelection,

    /// Explicit participant not on the team roster
    #[error("Player {player_id} is not on the roster of team {team_id}")]
    PlayerNotOnRoster { player_id: Uuid, team_id: String },

    /// Declaration target is not an event participant
    #[error("Player {0} is not a participant of this event")]
    NotAParticipant(Uuid),

    /// Attendance may only be declared while the event is scheduled
    #[error("Declarations are closed: event is {status}")]
    DeclarationsClosed { status: EventStatus },

    /// Update/delete of a declaration that was never submitted
    #[error("No declaration exists for player {0}")]
    DeclarationNotFound(Uuid),

    /// Status transition not permitted by the state machine
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    /// Main team must be one of the player's teams
    #[error("Main team {0} is not among the player's teams")]
    MainTeamNotInTeams(String),

    /// Editing an event to span multiple teams is unsupported
    #[error("Editing an event with more than one team is not supported")]
    MultiTeamEditUnsupported,

    /// Caller is not allowed to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Generic field validation failure
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Check if this is a not-found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TeamNotFound(_)
                | Self::PlayerNotFound(_)
                | Self::EventNotFound(_)
                | Self::UserNotFound(_)
                | Self::DeclarationNotFound(_)
        )
    }

    /// Check if this is a precondition violation (rejected before any write)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::TeamIdentityChange
                | Self::InvalidSlug(_)
                | Self::InvalidTimeWindow
                | Self::EmptyParticipantSelection
                | Self::PlayerNotOnRoster { .. }
                | Self::NotAParticipant(_)
                | Self::DeclarationsClosed { .. }
                | Self::InvalidTransition { .. }
                | Self::MainTeamNotInTeams(_)
                | Self::MultiTeamEditUnsupported
                | Self::Validation(_)
        )
    }
}
