//! Command handlers module
//!
//! Handlers orchestrate one business operation each: authorization by
//! role, domain mutation, then a repository commit. They sit between the
//! HTTP routes and the domain types.

mod attendance_handler;
mod commands;
mod event_handler;
mod player_handler;
mod team_handler;
mod visibility;

pub use attendance_handler::{
    AttendanceDetail, AttendanceHandler, AttendanceView, ParticipantAttendance,
};
pub use commands::*;
pub use event_handler::EventHandler;
pub use player_handler::PlayerHandler;
pub use team_handler::TeamHandler;
