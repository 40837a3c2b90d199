//! Attendance declarations
//!
//! One declaration per (event, player), kept as a map embedded in the
//! event so a declaration write stays atomic under a single document
//! update. Last write wins; no history is retained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declared attendance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Maybe,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Maybe => write!(f, "maybe"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "maybe" => Ok(AttendanceStatus::Maybe),
            other => Err(format!("unknown attendance status: {}", other)),
        }
    }
}

/// A parent's attendance submission for one player on one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDeclaration {
    pub parent_id: Uuid,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Map of player id to declaration, embedded in the event document.
///
/// BTreeMap keeps serialization order deterministic.
pub type DeclarationMap = BTreeMap<Uuid, AttendanceDeclaration>;

/// Derived attendance counts for one event. Recomputed on read, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub maybe: usize,
    pub undeclared: usize,
}

impl AttendanceSummary {
    /// Compute counts against the participant set size.
    pub fn compute(participant_count: usize, declarations: &DeclarationMap) -> Self {
        let mut present = 0;
        let mut absent = 0;
        let mut maybe = 0;
        for declaration in declarations.values() {
            match declaration.status {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Absent => absent += 1,
                AttendanceStatus::Maybe => maybe += 1,
            }
        }
        let declared = present + absent + maybe;
        AttendanceSummary {
            present,
            absent,
            maybe,
            undeclared: participant_count.saturating_sub(declared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(status: AttendanceStatus) -> AttendanceDeclaration {
        AttendanceDeclaration {
            parent_id: Uuid::new_v4(),
            status,
            timestamp: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Maybe,
        ] {
            let parsed: AttendanceStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("none".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_summary_counts() {
        // 5 participants, 2 present, 1 absent, 0 maybe -> 2 undeclared
        let mut declarations = DeclarationMap::new();
        declarations.insert(Uuid::new_v4(), declare(AttendanceStatus::Present));
        declarations.insert(Uuid::new_v4(), declare(AttendanceStatus::Present));
        declarations.insert(Uuid::new_v4(), declare(AttendanceStatus::Absent));

        let summary = AttendanceSummary::compute(5, &declarations);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.maybe, 0);
        assert_eq!(summary.undeclared, 2);
    }

    #[test]
    fn test_summary_empty() {
        let summary = AttendanceSummary::compute(3, &DeclarationMap::new());
        assert_eq!(summary.undeclared, 3);
        assert_eq!(summary.present, 0);
    }

    #[test]
    fn test_summary_never_negative() {
        // Stale declarations beyond the participant count must not
        // underflow the undeclared figure.
        let mut declarations = DeclarationMap::new();
        declarations.insert(Uuid::new_v4(), declare(AttendanceStatus::Present));
        declarations.insert(Uuid::new_v4(), declare(AttendanceStatus::Maybe));
        let summary = AttendanceSummary::compute(1, &declarations);
        assert_eq!(summary.undeclared, 0);
    }

    #[test]
    fn test_declaration_map_serializes_with_string_keys() {
        let player_id = Uuid::new_v4();
        let mut declarations = DeclarationMap::new();
        declarations.insert(player_id, declare(AttendanceStatus::Maybe));

        let json = serde_json::to_value(&declarations).unwrap();
        let entry = json.get(player_id.to_string()).unwrap();
        assert_eq!(entry["status"], "maybe");

        let back: DeclarationMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, declarations);
    }
}
