//! Common test utilities

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use academy_api::domain::{Event, EventType, Player};

/// Player on the given teams, linked to no parent account.
pub fn player_on(teams: &[&str]) -> Player {
    Player::new(
        "Γιώργος".to_string(),
        "Παπαδόπουλος".to_string(),
        None,
        teams.iter().map(|t| t.to_string()).collect(),
        None,
        None,
        Uuid::new_v4(),
        Utc::now(),
    )
    .expect("valid player")
}

/// Player on the given teams, linked to `parent_id`.
pub fn linked_player_on(teams: &[&str], parent_id: Uuid) -> Player {
    let mut player = player_on(teams);
    player.user_id = Some(parent_id);
    player
}

/// Training event for `team_id` with the given window offsets (minutes
/// relative to `now`) and the given participants.
pub fn training_event(
    team_id: &str,
    start_offset_min: i64,
    end_offset_min: Option<i64>,
    participant_ids: Vec<Uuid>,
    now: DateTime<Utc>,
) -> Event {
    Event::new(
        format!("Προπόνηση {}", team_id),
        None,
        EventType::Training,
        now + Duration::minutes(start_offset_min),
        end_offset_min.map(|m| now + Duration::minutes(m)),
        None,
        team_id.to_string(),
        participant_ids,
        None,
        Uuid::new_v4(),
        now,
    )
    .expect("valid event")
}
