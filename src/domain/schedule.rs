//! Derived event titles and descriptions
//!
//! When the caller supplies no title/description, both are composed from
//! the event type, team name and time window. The formatting is plain
//! string composition in Greek and must stay deterministic for the same
//! inputs, since multi-team batch creation derives one title per team.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use super::event::EventType;

/// Default location text when none is given.
pub const DEFAULT_LOCATION: &str = "Γήπεδο";

/// Greek label for an event type.
pub fn type_label(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Training => "Προπόνηση",
        EventType::Match => "Αγώνας",
        EventType::Event => "Εκδήλωση",
    }
}

/// Greek weekday name.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Δευτέρα",
        Weekday::Tue => "Τρίτη",
        Weekday::Wed => "Τετάρτη",
        Weekday::Thu => "Πέμπτη",
        Weekday::Fri => "Παρασκευή",
        Weekday::Sat => "Σάββατο",
        Weekday::Sun => "Κυριακή",
    }
}

/// Duration text from a minutes delta, in hours and minutes.
pub fn duration_label(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;
    let hour_word = if hours == 1 { "ώρα" } else { "ώρες" };
    match (hours, rest) {
        (0, m) => format!("{} λεπτά", m),
        (h, 0) => format!("{} {}", h, hour_word),
        (h, m) => format!("{} {} και {} λεπτά", h, hour_word, m),
    }
}

fn date_short(at: DateTime<Utc>) -> String {
    format!("{:02}/{:02}", at.day(), at.month())
}

fn date_full(at: DateTime<Utc>) -> String {
    format!("{:02}/{:02}/{}", at.day(), at.month(), at.year())
}

fn time_short(at: DateTime<Utc>) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

/// Derived title: `{label} {team} - {weekday} {dd/MM} {HH:mm}`.
pub fn derive_title(event_type: EventType, team_name: &str, start: DateTime<Utc>) -> String {
    format!(
        "{} {} - {} {} {}",
        type_label(event_type),
        team_name,
        weekday_label(start.weekday()),
        date_short(start),
        time_short(start)
    )
}

/// Derived description: adds full date, duration (when an end is known)
/// and location-or-default to the title components.
pub fn derive_description(
    event_type: EventType,
    team_name: &str,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    location: Option<&str>,
) -> String {
    let mut text = format!(
        "{} {} την {} {} στις {}",
        type_label(event_type),
        team_name,
        weekday_label(start.weekday()),
        date_full(start),
        time_short(start)
    );
    if let Some(end) = end {
        let minutes = (end - start).num_minutes();
        text.push_str(&format!(", διάρκεια {}", duration_label(minutes)));
    }
    let place = match location {
        Some(l) if !l.trim().is_empty() => l,
        _ => DEFAULT_LOCATION,
    };
    text.push_str(&format!(", {}", place));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_duration_under_an_hour() {
        assert_eq!(duration_label(45), "45 λεπτά");
        assert_eq!(duration_label(0), "0 λεπτά");
    }

    #[test]
    fn test_duration_exact_hours() {
        assert_eq!(duration_label(60), "1 ώρα");
        assert_eq!(duration_label(120), "2 ώρες");
    }

    #[test]
    fn test_duration_ninety_minutes_golden() {
        // 18:00-19:30 -> computed purely from the minutes delta
        assert_eq!(duration_label(90), "1 ώρα και 30 λεπτά");
    }

    #[test]
    fn test_duration_mixed() {
        assert_eq!(duration_label(135), "2 ώρες και 15 λεπτά");
        // Negative deltas clamp rather than panic
        assert_eq!(duration_label(-5), "0 λεπτά");
    }

    #[test]
    fn test_title_golden() {
        // 2026-09-07 is a Monday
        let title = derive_title(EventType::Training, "Κ10 Α", at(2026, 9, 7, 18, 0));
        assert_eq!(title, "Προπόνηση Κ10 Α - Δευτέρα 07/09 18:00");
    }

    #[test]
    fn test_description_golden() {
        let start = at(2026, 9, 7, 18, 0);
        let end = at(2026, 9, 7, 19, 30);
        let description =
            derive_description(EventType::Training, "Κ10 Α", start, Some(end), None);
        assert_eq!(
            description,
            "Προπόνηση Κ10 Α την Δευτέρα 07/09/2026 στις 18:00, διάρκεια 1 ώρα και 30 λεπτά, Γήπεδο"
        );
    }

    #[test]
    fn test_description_with_location_and_no_end() {
        let start = at(2026, 9, 12, 10, 30);
        let description = derive_description(
            EventType::Match,
            "Κ12 Β",
            start,
            None,
            Some("Δημοτικό Στάδιο"),
        );
        assert_eq!(
            description,
            "Αγώνας Κ12 Β την Σάββατο 12/09/2026 στις 10:30, Δημοτικό Στάδιο"
        );
    }

    #[test]
    fn test_blank_location_falls_back_to_default() {
        let start = at(2026, 9, 7, 18, 0);
        let description =
            derive_description(EventType::Event, "Κ10 Α", start, None, Some("  "));
        assert!(description.ends_with(DEFAULT_LOCATION));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let start = at(2026, 9, 7, 18, 0);
        let a = derive_title(EventType::Match, "Κ10 Α", start);
        let b = derive_title(EventType::Match, "Κ10 Α", start);
        assert_eq!(a, b);
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(weekday_label(Weekday::Sun), "Κυριακή");
        assert_eq!(weekday_label(Weekday::Wed), "Τετάρτη");
    }
}
