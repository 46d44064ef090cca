//! ICS generation for a materialized batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{Calendar, Component, Property};

use crate::error::{SeriesError, SeriesResult};
use crate::event::{GeneratedEvent, SeriesBatch};

/// Generate one VCALENDAR holding a VEVENT per generated session.
///
/// Times are floating (no TZID): sessions are naive local times.
/// `generated_at` becomes every DTSTAMP.
pub fn generate_calendar(batch: &SeriesBatch, generated_at: DateTime<Utc>) -> SeriesResult<String> {
    if batch.events.is_empty() {
        return Err(SeriesError::IcsGenerate(
            "series has no sessions to export".to_string(),
        ));
    }

    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let mut cal = Calendar::new();

    for event in &batch.events {
        cal.push(build_vevent(event, &dtstamp));
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn build_vevent(event: &GeneratedEvent, dtstamp: &str) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!(
        "{}-{}@eventseries",
        event.series_id, event.sequence_number
    ));
    ics_event.summary(&event.title);
    ics_event.add_property("DTSTAMP", dtstamp);

    add_floating_property(&mut ics_event, "DTSTART", &event.start);
    add_floating_property(&mut ics_event, "DTEND", &event.end);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(ref url) = event.links.website_url {
        ics_event.add_property("URL", url);
    }

    if !event.tags.is_empty() {
        ics_event.add_property("CATEGORIES", event.tags.join(","));
    }

    // Series linkage, preserved for re-import
    ics_event.add_property("X-SERIES-ID", event.series_id.to_string());
    ics_event.add_property("X-SEQUENCE-NUMBER", event.sequence_number.to_string());

    if let Some(ref location_id) = event.location_id {
        ics_event.add_property("X-LOCATION-ID", location_id);
    }
    if let Some(ref organizer_id) = event.organizer_id {
        ics_event.add_property("X-ORGANIZER-ID", organizer_id);
    }

    ics_event.done()
}

/// Floating datetime (no Z, no TZID)
fn add_floating_property(ics_event: &mut icalendar::Event, name: &str, dt: &NaiveDateTime) {
    let prop = Property::new(name, dt.format("%Y%m%dT%H%M%S").to_string());
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with EVENTSERIES
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:EVENTSERIES\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDraft, EventLinks};
    use crate::materialize::{SessionTimes, TitleTemplate, materialize};
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use uuid::Uuid;

    fn make_batch() -> SeriesBatch {
        let draft = EventDraft {
            title: "Night Market".to_string(),
            description: Some("Food stalls and music".to_string()),
            links: EventLinks {
                website_url: Some("https://example.com/market".to_string()),
                ticket_url: None,
            },
            location_id: Some("loc-1".to_string()),
            tags: vec!["food".to_string(), "music".to_string()],
            ..EventDraft::default()
        };
        let dates = [
            NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
        ];
        materialize(
            &draft,
            Uuid::nil(),
            &dates,
            SessionTimes::Duration {
                start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                minutes: 240,
            },
            &TitleTemplate::Session,
        )
        .unwrap()
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_one_vevent_per_session() {
        let ics = generate_calendar(&make_batch(), generated_at()).unwrap();

        let vevent_count = ics.lines().filter(|l| *l == "BEGIN:VEVENT").count();
        assert_eq!(vevent_count, 2, "Should have 2 VEVENTs. ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Night Market - Session 2"));
    }

    #[test]
    fn test_floating_times_and_stamp() {
        let ics = generate_calendar(&make_batch(), generated_at()).unwrap();

        assert!(ics.contains("DTSTART:20260703T180000"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20260703T220000"), "ICS:\n{}", ics);
        assert!(!ics.contains("DTSTART:20260703T180000Z"));
        assert!(ics.contains("DTSTAMP:20260601T120000Z"));
    }

    #[test]
    fn test_series_properties() {
        let ics = generate_calendar(&make_batch(), generated_at()).unwrap();

        assert!(ics.contains(&format!("UID:{}-1@eventseries", Uuid::nil())));
        assert!(ics.contains("X-SEQUENCE-NUMBER:2"));
        assert!(ics.contains("X-LOCATION-ID:loc-1"));
        assert!(
            ics.lines()
                .any(|l| l.starts_with("CATEGORIES:") && l.contains("food") && l.contains("music")),
            "ICS:\n{}",
            ics
        );
        assert!(ics.contains("URL:https://example.com/market"));
    }

    #[test]
    fn test_bloat_stripped() {
        let ics = generate_calendar(&make_batch(), generated_at()).unwrap();

        assert!(ics.contains("PRODID:EVENTSERIES"));
        assert!(!ics.contains("CALSCALE:GREGORIAN"));
    }
}
