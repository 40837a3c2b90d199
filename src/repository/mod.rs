//! Repository module
//!
//! Typed access layer over the persistence store: one repository per
//! collection, with role-scoped list queries built from the caller's
//! `Session`. All queries are runtime-bound; no compile-time schema
//! coupling.

mod events;
mod players;
mod teams;
mod users;

pub use events::EventRepository;
pub use players::PlayerRepository;
pub use teams::TeamRepository;
pub use users::{UserProfile, UserRepository};
