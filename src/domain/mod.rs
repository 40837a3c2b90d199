//! Domain module
//!
//! Core domain types and business logic, independent of HTTP and the
//! persistence layer.

pub mod attendance;
pub mod context;
pub mod error;
pub mod event;
pub mod player;
pub mod role;
pub mod schedule;
pub mod slug;
pub mod team;
pub mod visibility;

pub use attendance::{AttendanceDeclaration, AttendanceStatus, AttendanceSummary, DeclarationMap};
pub use context::Session;
pub use error::DomainError;
pub use event::{resolve_participants, Event, EventStatus, EventType, ParticipantSelection};
pub use player::{roster, Player};
pub use role::{can_perform, Action, Resource, Role};
pub use team::Team;
pub use visibility::{event_visible, player_visible, team_visible};
