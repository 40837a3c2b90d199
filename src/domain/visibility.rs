//! Row-level visibility predicates
//!
//! List queries scope rows in SQL; the by-id read paths must enforce the
//! same rules. These predicates answer the row question given the
//! caller's linked players (parents) or coached team ids (coaches), so
//! they stay pure and testable without a database.

use uuid::Uuid;

use super::context::Session;
use super::event::Event;
use super::player::Player;
use super::role::Role;
use super::team::Team;

/// May the caller see this team? Parents see teams any of their linked
/// players belongs to.
pub fn team_visible(team: &Team, session: &Session, linked_players: &[Player]) -> bool {
    match session.role {
        Role::Superadmin => true,
        Role::Coach => team.has_coach(session.user_id),
        Role::Parent => linked_players.iter().any(|p| p.is_on_team(&team.id)),
    }
}

/// May the caller see this player? Coaches see players on any team they
/// are assigned to.
pub fn player_visible(player: &Player, session: &Session, coached_team_ids: &[String]) -> bool {
    match session.role {
        Role::Superadmin => true,
        Role::Coach => player.team_ids.iter().any(|t| coached_team_ids.contains(t)),
        Role::Parent => player.is_linked_to(session.user_id),
    }
}

/// May the caller see this event, including its attendance declarations?
/// Parents need a linked player among the participants; coaches need an
/// assignment on one of the event's teams.
pub fn event_visible(
    event: &Event,
    session: &Session,
    linked_player_ids: &[Uuid],
    coached_team_ids: &[String],
) -> bool {
    match session.role {
        Role::Superadmin => true,
        Role::Coach => event.team_ids.iter().any(|t| coached_team_ids.contains(t)),
        Role::Parent => linked_player_ids
            .iter()
            .any(|id| event.participant_ids.contains(id)),
    }
}
