//! By-id visibility enforcement
//!
//! The list endpoints scope rows in SQL. These helpers load the caller's
//! linked players or coached teams and apply the same predicates on the
//! by-id paths, so fetching a row by id never widens what a role can see.

use crate::domain::{
    event_visible, player_visible, team_visible, DomainError, Event, Player, Role, Session, Team,
};
use crate::error::AppError;
use crate::repository::{PlayerRepository, TeamRepository};

pub(crate) async fn ensure_team_visible(
    players: &PlayerRepository,
    team: &Team,
    session: &Session,
) -> Result<(), AppError> {
    let visible = match session.role {
        Role::Parent => {
            let linked = players.list(session, None).await?;
            team_visible(team, session, &linked)
        }
        _ => team_visible(team, session, &[]),
    };
    if visible {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(
            "Team is not visible to this account".to_string(),
        )
        .into())
    }
}

pub(crate) async fn ensure_player_visible(
    teams: &TeamRepository,
    player: &Player,
    session: &Session,
) -> Result<(), AppError> {
    let visible = match session.role {
        Role::Coach => {
            let coached: Vec<String> = teams
                .list(session)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();
            player_visible(player, session, &coached)
        }
        _ => player_visible(player, session, &[]),
    };
    if visible {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(
            "Player is not visible to this account".to_string(),
        )
        .into())
    }
}

pub(crate) async fn ensure_event_visible(
    teams: &TeamRepository,
    players: &PlayerRepository,
    event: &Event,
    session: &Session,
) -> Result<(), AppError> {
    let visible = match session.role {
        Role::Superadmin => true,
        Role::Coach => {
            let coached: Vec<String> = teams
                .list(session)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();
            event_visible(event, session, &[], &coached)
        }
        Role::Parent => {
            let linked = players.linked_player_ids(session.user_id).await?;
            event_visible(event, session, &linked, &[])
        }
    };
    if visible {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(
            "Event is not visible to this account".to_string(),
        )
        .into())
    }
}
