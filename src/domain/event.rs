//! Event entity and status state machine
//!
//! Events move `scheduled -> in-progress -> completed` driven by their
//! time window; `cancelled` is terminal and reachable only by explicit
//! user action, never by the automatic sweep. The transition rule is a
//! pure function of the event and `now`, shared by the sweep job and
//! interactive re-derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::attendance::{
    AttendanceDeclaration, AttendanceStatus, AttendanceSummary, DeclarationMap,
};
use super::error::DomainError;
use super::player::Player;

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Training,
    Match,
    Event,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Training => write!(f, "training"),
            EventType::Match => write!(f, "match"),
            EventType::Event => write!(f, "event"),
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "training" => Ok(EventType::Training),
            "match" => Ok(EventType::Match),
            "event" => Ok(EventType::Event),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Cancelled)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Scheduled => write!(f, "scheduled"),
            EventStatus::InProgress => write!(f, "in-progress"),
            EventStatus::Completed => write!(f, "completed"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(EventStatus::Scheduled),
            "in-progress" => Ok(EventStatus::InProgress),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(format!("unknown event status: {}", other)),
        }
    }
}

/// Participant selection mode at event creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode", content = "player_ids")]
pub enum ParticipantSelection {
    /// Snapshot of the whole current roster of the event's team
    AllRoster,
    /// Caller-supplied subset of the roster
    Explicit(Vec<Uuid>),
}

/// Resolve `participant_ids` for one team against its current roster.
///
/// This is a creation-time snapshot: later roster changes never alter the
/// participants of already-created events.
pub fn resolve_participants(
    selection: &ParticipantSelection,
    team_id: &str,
    roster: &[&Player],
) -> Result<Vec<Uuid>, DomainError> {
    match selection {
        ParticipantSelection::AllRoster => Ok(roster.iter().map(|p| p.id).collect()),
        ParticipantSelection::Explicit(player_ids) => {
            if player_ids.is_empty() {
                return Err(DomainError::EmptyParticipantSelection);
            }
            for player_id in player_ids {
                if !roster.iter().any(|p| p.id == *player_id) {
                    return Err(DomainError::PlayerNotOnRoster {
                        player_id: *player_id,
                        team_id: team_id.to_string(),
                    });
                }
            }
            Ok(player_ids.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// One team per event in current usage; kept as a set for the wire shape
    pub team_ids: Vec<String>,
    /// Eligible declarers, fixed at creation
    pub participant_ids: Vec<Uuid>,
    /// Opponent name, for matches
    pub opponent: Option<String>,
    pub status: EventStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attendance_declarations: DeclarationMap,
}

impl Event {
    /// Create a new scheduled event.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        description: Option<String>,
        event_type: EventType,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        location: Option<String>,
        team_id: String,
        participant_ids: Vec<Uuid>,
        opponent: Option<String>,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if let Some(end) = end_date {
            if end <= start_date {
                return Err(DomainError::InvalidTimeWindow);
            }
        }
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Event title is required".to_string()));
        }

        Ok(Event {
            id: Uuid::new_v4(),
            title,
            description,
            event_type,
            start_date,
            end_date,
            location,
            team_ids: vec![team_id],
            participant_ids,
            opponent,
            status: EventStatus::Scheduled,
            created_by,
            created_at: now,
            updated_at: now,
            attendance_declarations: DeclarationMap::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Status state machine
    // ---------------------------------------------------------------------

    /// Evaluate the time-driven transition rule against `now`.
    ///
    /// End-time has priority over start-time: an event whose end has
    /// passed completes directly even if it was never marked in-progress.
    /// Returns `None` when no transition is due, which makes re-running
    /// the rule idempotent.
    pub fn due_transition(&self, now: DateTime<Utc>) -> Option<EventStatus> {
        if self.status.is_terminal() {
            return None;
        }
        if let Some(end) = self.end_date {
            if end <= now {
                return Some(EventStatus::Completed);
            }
        }
        if self.status == EventStatus::Scheduled && self.start_date <= now {
            return Some(EventStatus::InProgress);
        }
        None
    }

    /// Apply the due transition, if any, stamping `updated_at`.
    /// Returns true when the status changed.
    pub fn apply_due_transition(&mut self, now: DateTime<Utc>) -> bool {
        match self.due_transition(now) {
            Some(next) => {
                self.status = next;
                self.updated_at = now;
                true
            }
            None => false,
        }
    }

    /// Explicit cancellation. Allowed from scheduled or in-progress only;
    /// the sweep never cancels.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: EventStatus::Cancelled,
            });
        }
        self.status = EventStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Attendance declaration bookkeeping
    // ---------------------------------------------------------------------

    /// Submit a declaration for a participant. Rejected unless the event
    /// is still scheduled; this is a core invariant, not a UI concern.
    pub fn submit_declaration(
        &mut self,
        player_id: Uuid,
        parent_id: Uuid,
        status: AttendanceStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status != EventStatus::Scheduled {
            return Err(DomainError::DeclarationsClosed {
                status: self.status,
            });
        }
        if !self.participant_ids.contains(&player_id) {
            return Err(DomainError::NotAParticipant(player_id));
        }
        self.attendance_declarations.insert(
            player_id,
            AttendanceDeclaration {
                parent_id,
                status,
                timestamp: now,
                notes,
            },
        );
        self.updated_at = now;
        Ok(())
    }

    /// Overwrite an existing declaration. Any parent linked to the player
    /// may update; the original declarant is not privileged.
    pub fn update_declaration(
        &mut self,
        player_id: Uuid,
        parent_id: Uuid,
        status: AttendanceStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let declaration = self
            .attendance_declarations
            .get_mut(&player_id)
            .ok_or(DomainError::DeclarationNotFound(player_id))?;
        declaration.parent_id = parent_id;
        declaration.status = status;
        declaration.notes = notes;
        declaration.timestamp = now;
        self.updated_at = now;
        Ok(())
    }

    /// Remove a declaration entirely (no "none" sentinel is kept).
    pub fn remove_declaration(
        &mut self,
        player_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.attendance_declarations.remove(&player_id).is_none() {
            return Err(DomainError::DeclarationNotFound(player_id));
        }
        self.updated_at = now;
        Ok(())
    }

    /// Derived attendance counts for this event.
    pub fn attendance_summary(&self) -> AttendanceSummary {
        AttendanceSummary::compute(self.participant_ids.len(), &self.attendance_declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event_at(
        start_offset_min: i64,
        end_offset_min: Option<i64>,
        now: DateTime<Utc>,
    ) -> Event {
        Event::new(
            "Προπόνηση Κ10 Α".to_string(),
            None,
            EventType::Training,
            now + Duration::minutes(start_offset_min),
            end_offset_min.map(|m| now + Duration::minutes(m)),
            None,
            "k10-a".to_string(),
            vec![Uuid::new_v4(), Uuid::new_v4()],
            None,
            Uuid::new_v4(),
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_new_event_is_scheduled() {
        let now = Utc::now();
        let event = event_at(60, Some(150), now);
        assert_eq!(event.status, EventStatus::Scheduled);
        assert!(event.attendance_declarations.is_empty());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let now = Utc::now();
        let result = Event::new(
            "x".to_string(),
            None,
            EventType::Match,
            now + Duration::minutes(60),
            Some(now + Duration::minutes(30)),
            None,
            "k10-a".to_string(),
            vec![],
            None,
            Uuid::new_v4(),
            now,
        );
        assert_eq!(result.unwrap_err(), DomainError::InvalidTimeWindow);
    }

    #[test]
    fn test_no_transition_before_start() {
        let now = Utc::now();
        let event = event_at(60, Some(150), now);
        assert_eq!(event.due_transition(now), None);
    }

    #[test]
    fn test_scheduled_to_in_progress_after_start() {
        let now = Utc::now();
        let mut event = event_at(-10, Some(80), now);
        assert_eq!(event.due_transition(now), Some(EventStatus::InProgress));
        assert!(event.apply_due_transition(now));
        assert_eq!(event.status, EventStatus::InProgress);
        assert_eq!(event.updated_at, now);
    }

    #[test]
    fn test_end_time_priority_skips_in_progress() {
        // End already passed while still scheduled: complete directly.
        let now = Utc::now();
        let mut event = event_at(-120, Some(-30), now);
        assert_eq!(event.due_transition(now), Some(EventStatus::Completed));
        assert!(event.apply_due_transition(now));
        assert_eq!(event.status, EventStatus::Completed);
    }

    #[test]
    fn test_in_progress_to_completed() {
        let now = Utc::now();
        let mut event = event_at(-120, Some(-1), now);
        event.status = EventStatus::InProgress;
        assert!(event.apply_due_transition(now));
        assert_eq!(event.status, EventStatus::Completed);
    }

    #[test]
    fn test_idempotent_rule() {
        let now = Utc::now();
        let mut event = event_at(-10, Some(80), now);
        assert!(event.apply_due_transition(now));
        // Second run with no time change: no further mutation.
        let updated_at = event.updated_at;
        assert!(!event.apply_due_transition(now));
        assert_eq!(event.updated_at, updated_at);
    }

    #[test]
    fn test_no_end_date_stays_in_progress() {
        let now = Utc::now();
        let mut event = event_at(-10, None, now);
        assert!(event.apply_due_transition(now));
        assert_eq!(event.status, EventStatus::InProgress);
        assert!(!event.apply_due_transition(now));
    }

    #[test]
    fn test_cancelled_is_terminal_for_the_rule() {
        let now = Utc::now();
        let mut event = event_at(-120, Some(-30), now);
        event.cancel(now).unwrap();
        assert_eq!(event.due_transition(now), None);
    }

    #[test]
    fn test_cancel_from_scheduled_and_in_progress_only() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        assert!(event.cancel(now).is_ok());
        assert_eq!(event.status, EventStatus::Cancelled);

        let mut event = event_at(-10, Some(80), now);
        event.apply_due_transition(now);
        assert_eq!(event.status, EventStatus::InProgress);
        assert!(event.cancel(now).is_ok());

        let mut event = event_at(-120, Some(-30), now);
        event.apply_due_transition(now);
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.cancel(now).is_err());
    }

    #[test]
    fn test_submit_requires_scheduled_status() {
        let now = Utc::now();
        let mut event = event_at(-10, Some(80), now);
        let player_id = event.participant_ids[0];
        event.apply_due_transition(now);
        assert_eq!(event.status, EventStatus::InProgress);

        let result = event.submit_declaration(
            player_id,
            Uuid::new_v4(),
            AttendanceStatus::Present,
            None,
            now,
        );
        assert_eq!(
            result.unwrap_err(),
            DomainError::DeclarationsClosed {
                status: EventStatus::InProgress
            }
        );
    }

    #[test]
    fn test_submit_and_read_back() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        let player_id = event.participant_ids[0];
        let parent_id = Uuid::new_v4();

        event
            .submit_declaration(
                player_id,
                parent_id,
                AttendanceStatus::Present,
                Some("θα έρθει".to_string()),
                now,
            )
            .unwrap();

        let declaration = &event.attendance_declarations[&player_id];
        assert_eq!(declaration.parent_id, parent_id);
        assert_eq!(declaration.status, AttendanceStatus::Present);
        assert_eq!(declaration.notes.as_deref(), Some("θα έρθει"));
    }

    #[test]
    fn test_submit_rejects_non_participant() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        let outsider = Uuid::new_v4();
        let result =
            event.submit_declaration(outsider, Uuid::new_v4(), AttendanceStatus::Maybe, None, now);
        assert_eq!(result.unwrap_err(), DomainError::NotAParticipant(outsider));
    }

    #[test]
    fn test_update_overwrites_last_write_wins() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        let player_id = event.participant_ids[0];
        let first_parent = Uuid::new_v4();
        let second_parent = Uuid::new_v4();

        event
            .submit_declaration(player_id, first_parent, AttendanceStatus::Present, None, now)
            .unwrap();
        // Another parent linked to the same player overwrites freely.
        let later = now + Duration::minutes(5);
        event
            .update_declaration(
                player_id,
                second_parent,
                AttendanceStatus::Absent,
                Some("άρρωστος".to_string()),
                later,
            )
            .unwrap();

        let declaration = &event.attendance_declarations[&player_id];
        assert_eq!(declaration.parent_id, second_parent);
        assert_eq!(declaration.status, AttendanceStatus::Absent);
        assert_eq!(declaration.timestamp, later);
    }

    #[test]
    fn test_update_requires_existing_declaration() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        let player_id = event.participant_ids[0];
        let result = event.update_declaration(
            player_id,
            Uuid::new_v4(),
            AttendanceStatus::Maybe,
            None,
            now,
        );
        assert_eq!(result.unwrap_err(), DomainError::DeclarationNotFound(player_id));
    }

    #[test]
    fn test_remove_clears_entry() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        let player_id = event.participant_ids[0];
        event
            .submit_declaration(player_id, Uuid::new_v4(), AttendanceStatus::Maybe, None, now)
            .unwrap();
        event.remove_declaration(player_id, now).unwrap();
        assert!(!event.attendance_declarations.contains_key(&player_id));
        // Removing again is a not-found error, not a no-op
        assert!(event.remove_declaration(player_id, now).is_err());
    }

    #[test]
    fn test_attendance_summary() {
        let now = Utc::now();
        let mut event = event_at(60, Some(150), now);
        event.participant_ids = (0..5).map(|_| Uuid::new_v4()).collect();
        let p = event.participant_ids.clone();
        event
            .submit_declaration(p[0], Uuid::new_v4(), AttendanceStatus::Present, None, now)
            .unwrap();
        event
            .submit_declaration(p[1], Uuid::new_v4(), AttendanceStatus::Present, None, now)
            .unwrap();
        event
            .submit_declaration(p[2], Uuid::new_v4(), AttendanceStatus::Absent, None, now)
            .unwrap();

        let summary = event.attendance_summary();
        assert_eq!(summary.present, 2);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.maybe, 0);
        assert_eq!(summary.undeclared, 2);
    }

    #[test]
    fn test_status_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&EventStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: EventStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, EventStatus::Cancelled);
    }

    mod participants {
        use super::*;
        use crate::domain::player::Player;

        fn roster_player(team: &str) -> Player {
            Player::new(
                "A".to_string(),
                "B".to_string(),
                None,
                vec![team.to_string()],
                None,
                None,
                Uuid::new_v4(),
                Utc::now(),
            )
            .unwrap()
        }

        #[test]
        fn test_all_roster_snapshot() {
            let players = vec![
                roster_player("k10-a"),
                roster_player("k10-a"),
                roster_player("k10-a"),
            ];
            let roster: Vec<&Player> = players.iter().collect();
            let ids =
                resolve_participants(&ParticipantSelection::AllRoster, "k10-a", &roster).unwrap();
            assert_eq!(ids.len(), 3);
            assert!(players.iter().all(|p| ids.contains(&p.id)));
        }

        #[test]
        fn test_explicit_subset_ok() {
            let players = vec![roster_player("k10-a"), roster_player("k10-a")];
            let roster: Vec<&Player> = players.iter().collect();
            let selection = ParticipantSelection::Explicit(vec![players[0].id]);
            let ids = resolve_participants(&selection, "k10-a", &roster).unwrap();
            assert_eq!(ids, vec![players[0].id]);
        }

        #[test]
        fn test_explicit_empty_rejected() {
            let players = vec![roster_player("k10-a")];
            let roster: Vec<&Player> = players.iter().collect();
            let result = resolve_participants(
                &ParticipantSelection::Explicit(vec![]),
                "k10-a",
                &roster,
            );
            assert_eq!(result.unwrap_err(), DomainError::EmptyParticipantSelection);
        }

        #[test]
        fn test_explicit_off_roster_rejected() {
            let players = vec![roster_player("k10-a")];
            let roster: Vec<&Player> = players.iter().collect();
            let outsider = Uuid::new_v4();
            let result = resolve_participants(
                &ParticipantSelection::Explicit(vec![outsider]),
                "k10-a",
                &roster,
            );
            assert_eq!(
                result.unwrap_err(),
                DomainError::PlayerNotOnRoster {
                    player_id: outsider,
                    team_id: "k10-a".to_string()
                }
            );
        }
    }
}
